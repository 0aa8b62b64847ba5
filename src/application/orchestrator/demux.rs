//! 响应解复用
//!
//! 进程内唯一的订阅任务：按 correlation_id 把 Response Bus 上的每条响应转发给对应请求

use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use std::sync::Arc;
use tokio::task::JoinHandle;

use super::correlation::{CorrelationTable, DispatchOutcome};
use crate::application::ports::{BusError, JobResponse, ResponseBusPort};

/// 订阅并启动解复用任务
pub async fn spawn_demultiplexer(
    bus: Arc<dyn ResponseBusPort>,
    table: Arc<CorrelationTable>,
) -> Result<JoinHandle<()>, BusError> {
    let stream = bus.subscribe().await?;
    Ok(tokio::spawn(run_demultiplexer(stream, table)))
}

/// 消费响应流直到结束，结束后关闭关联表
pub async fn run_demultiplexer(
    mut stream: BoxStream<'static, JobResponse>,
    table: Arc<CorrelationTable>,
) {
    tracing::info!("Demultiplexer started");

    while let Some(response) = stream.next().await {
        let correlation_id = response.correlation_id.clone();
        tracing::debug!(
            correlation_id = %correlation_id,
            worker_id = ?response.worker_id,
            length = response.payload.length,
            time = response.time,
            "Response received"
        );

        match table.dispatch(response) {
            DispatchOutcome::Delivered => {}
            DispatchOutcome::Unknown => {
                tracing::debug!(correlation_id = %correlation_id, "Late or unknown response, dropped");
            }
            DispatchOutcome::Dropped => {
                tracing::warn!(correlation_id = %correlation_id, "Request no longer waiting, response dropped");
            }
        }
    }

    table.close();
    tracing::info!("Demultiplexer stopped");
}
