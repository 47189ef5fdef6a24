// THEORY:
// The `RigMonitor` lets several tasks share one rig without ever interleaving two
// triplets. A single actor task owns the `RigView`; every caller holds a cheap,
// cloneable handle and talks to the actor through a bounded channel, getting its
// answer back on a oneshot reply. Because only the actor touches the rig, triplets
// are applied strictly one after another, in the order they reach the queue.

use crate::core_modules::grid::grid::Grid;
use crate::error::{IntakeError, MonitorError};
use crate::rig::{RigView, Role};
use log::{debug, info};
use tokio::sync::{mpsc, oneshot};

/// Message type for the rig actor.
enum MonitorMessage {
    Intake {
        front: Grid,
        side: Grid,
        top: Grid,
        reply: oneshot::Sender<Result<(), IntakeError>>,
    },
    Snapshot(oneshot::Sender<RigSnapshot>),
    Shutdown,
}

/// The state of one camera at the moment a snapshot was taken.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraSnapshot {
    pub role: Role,
    /// Number of frames in the camera's history, bootstrap included.
    pub frames: usize,
    pub reference: Grid,
}

/// A point-in-time view of every camera on the rig.
#[derive(Debug, Clone, PartialEq)]
pub struct RigSnapshot {
    /// Triplets accepted since the monitor started.
    pub accepted: u64,
    /// Triplets rejected since the monitor started.
    pub rejected: u64,
    pub cameras: Vec<CameraSnapshot>,
}

/// A handle to the task that owns a rig.
#[derive(Clone)]
pub struct RigMonitor {
    sender: mpsc::Sender<MonitorMessage>,
}

impl RigMonitor {
    /// Moves `rig` into a new actor task. Must be called from within a tokio runtime.
    pub fn spawn(rig: RigView, queue_capacity: usize) -> Self {
        let (sender, mut receiver) = mpsc::channel::<MonitorMessage>(queue_capacity.max(1));

        tokio::spawn(async move {
            let mut rig = rig;
            let mut accepted = 0u64;
            let mut rejected = 0u64;

            while let Some(msg) = receiver.recv().await {
                match msg {
                    MonitorMessage::Intake {
                        front,
                        side,
                        top,
                        reply,
                    } => {
                        let result = rig.intake(front, side, top);
                        if result.is_ok() {
                            accepted += 1;
                        } else {
                            rejected += 1;
                        }
                        let _ = reply.send(result);
                    }
                    MonitorMessage::Snapshot(reply) => {
                        let _ = reply.send(snapshot(&rig, accepted, rejected));
                    }
                    MonitorMessage::Shutdown => break,
                }
            }
            info!("rig monitor stopped after {accepted} accepted and {rejected} rejected triplets");
        });

        Self { sender }
    }

    /// Queues a triplet and waits for the rig's decision.
    pub async fn intake(&self, front: Grid, side: Grid, top: Grid) -> Result<(), MonitorError> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(MonitorMessage::Intake {
                front,
                side,
                top,
                reply,
            })
            .await
            .map_err(|_| MonitorError::Closed)?;

        response.await.map_err(|_| MonitorError::Closed)??;
        Ok(())
    }

    pub async fn snapshot(&self) -> Result<RigSnapshot, MonitorError> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(MonitorMessage::Snapshot(reply))
            .await
            .map_err(|_| MonitorError::Closed)?;
        response.await.map_err(|_| MonitorError::Closed)
    }

    /// Asks the actor to stop. Requests already queued ahead of this one are still served.
    pub async fn shutdown(&self) {
        debug!("rig monitor shutdown requested");
        let _ = self.sender.send(MonitorMessage::Shutdown).await;
    }
}

fn snapshot(rig: &RigView, accepted: u64, rejected: u64) -> RigSnapshot {
    let cameras = Role::INTAKE_ORDER
        .iter()
        .map(|&role| {
            let camera = rig.camera(role);
            CameraSnapshot {
                role,
                frames: camera.history().len(),
                reference: camera.reference().clone(),
            }
        })
        .collect();
    RigSnapshot {
        accepted,
        rejected,
        cameras,
    }
}
