use crate::infrastructure::queue::rabbitmq::RabbitMqService;
use crate::modules::transcode::events::UploadEvent;
use crate::modules::transcode::service::TranscodeService;
use futures_util::StreamExt;
use lapin::options::BasicAckOptions;
use lapin::Consumer;
use tracing::{debug, error, info};

/// Consumes storage upload events from `queue` and runs them through ingest.
/// Every delivery is acked, including ones that could not be parsed.
pub async fn start_upload_worker(queue: RabbitMqService, queue_name: String, transcode: TranscodeService) {
    info!("📥 Starting upload event worker...");

    let consumer = match queue.consume(&queue_name, "upload_event_worker").await {
        Ok(consumer) => consumer,
        Err(e) => {
            error!("❌ Upload event worker could not start: {}", e);
            return;
        }
    };

    info!("📥 Upload event worker listening on '{}'", queue_name);

    run(consumer, |payload| {
        let transcode = transcode.clone();
        async move {
            match serde_json::from_slice::<UploadEvent>(&payload) {
                Ok(event) => {
                    let outcome = transcode.ingest.handle(&event).await;
                    debug!("Upload {} handled: {:?}", event.path, outcome);
                }
                Err(e) => error!("❌ Failed to parse upload event: {}", e),
            }
        }
    })
    .await;
}

/// Consumes transcoder job notifications from `queue` and applies them.
pub async fn start_transcoder_update_worker(
    queue: RabbitMqService,
    queue_name: String,
    transcode: TranscodeService,
) {
    info!("🎥 Starting transcoder update worker...");

    let consumer = match queue.consume(&queue_name, "transcoder_update_worker").await {
        Ok(consumer) => consumer,
        Err(e) => {
            error!("❌ Transcoder update worker could not start: {}", e);
            return;
        }
    };

    info!("🎥 Transcoder update worker listening on '{}'", queue_name);

    run(consumer, |payload| {
        let transcode = transcode.clone();
        async move {
            let outcome = transcode.callbacks.handle_payload(&payload).await;
            debug!("Transcoder update handled: {:?}", outcome);
        }
    })
    .await;
}

async fn run<F, Fut>(mut consumer: Consumer, handle: F)
where
    F: Fn(Vec<u8>) -> Fut,
    Fut: std::future::Future<Output = ()>,
{
    while let Some(delivery) = consumer.next().await {
        let delivery = match delivery {
            Ok(delivery) => delivery,
            Err(e) => {
                error!("❌ Consumer error: {}", e);
                continue;
            }
        };

        handle(delivery.data.clone()).await;

        if let Err(e) = delivery.ack(BasicAckOptions::default()).await {
            error!("Failed to ack message: {}", e);
        }
    }

    info!("Consumer stream closed");
}
