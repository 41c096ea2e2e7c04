//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod aws_control_plane;
mod console_alerting_channel;
mod in_memory_control_plane;
mod sns_alerting_channel;
mod webhook_alerting_channel;

pub use aws_control_plane::AwsControlPlane;
pub use console_alerting_channel::ConsoleAlertingChannel;
pub use in_memory_control_plane::InMemoryControlPlane;
pub use sns_alerting_channel::SnsAlertingChannel;
pub use webhook_alerting_channel::WebhookAlertingChannel;
