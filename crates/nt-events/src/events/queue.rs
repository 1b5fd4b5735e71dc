use serde::{Deserialize, Serialize};

/// Events emitted by the downloads publisher (F) and the queue bus itself (E).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum QueueEvent {
    /// The publisher started streaming candidates for a publish run.
    PublishRunStarted,

    /// A batch of package ids was published to the durable queue.
    BatchPublished { batch_size: usize },

    /// The publish run finished; no batch is retried from within the process.
    PublishRunCompleted { batches_published: usize },

    /// A batch was consumed off the queue by a download worker.
    BatchConsumed { batch_size: usize },

    /// A consumed batch was acknowledged after the worker finished its attempt.
    BatchAcked,

    /// A consumed batch was nacked and requeued.
    BatchNacked { requeue: bool, reason: String },

    /// The connection to the bus was lost and is being re-established.
    ConnectionLost { error: String },

    ConnectionRestored,
}
