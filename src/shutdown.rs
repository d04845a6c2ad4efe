//! Shutdown fan-out shared by the agent's accept loop and refresh task.
use tokio::sync::broadcast;

pub type ShutdownSender = broadcast::Sender<()>;
pub type ShutdownReceiver = broadcast::Receiver<()>;
