//! Task lifecycle event publishing.

use std::sync::mpsc::{channel, Sender};
use std::sync::{Arc, Mutex};
use std::thread;

use chrono::{DateTime, Utc};
use containerd_shim::event::Event;
use containerd_shim::protos::protobuf::well_known_types::timestamp::Timestamp;
use containerd_shim::protos::protobuf::MessageDyn;
use containerd_shim::publisher::RemotePublisher;
use log::warn;
use ttrpc::context::Context;

/// Sink for task lifecycle events.
pub trait EventSender: Clone + Send + Sync + 'static {
    fn send(&self, event: impl Event);
}

/// Forwards events to containerd through the shim publisher on a
/// dedicated thread, so RPC handlers never block on publishing.
#[derive(Clone)]
pub struct RemoteEventSender {
    tx: Arc<Mutex<Sender<(String, Box<dyn MessageDyn>)>>>,
}

impl RemoteEventSender {
    pub fn new(namespace: impl AsRef<str>, publisher: RemotePublisher) -> Self {
        let namespace = namespace.as_ref().to_string();
        let (tx, rx) = channel::<(String, Box<dyn MessageDyn>)>();

        let spawned = thread::Builder::new()
            .name("event-publisher".to_string())
            .spawn(move || {
                for (topic, event) in rx.iter() {
                    publisher
                        .publish(Context::default(), &topic, &namespace, event)
                        .unwrap_or_else(|err| {
                            warn!("failed to publish event for topic {topic}: {err}")
                        });
                }
            });
        if let Err(err) = spawned {
            warn!("could not spawn event publisher thread: {err}");
        }

        RemoteEventSender {
            tx: Arc::new(Mutex::new(tx)),
        }
    }
}

impl EventSender for RemoteEventSender {
    fn send(&self, event: impl Event) {
        let topic = event.topic();
        self.tx
            .lock()
            .unwrap()
            .send((topic.clone(), Box::new(event)))
            .unwrap_or_else(|err| warn!("failed to queue event for topic {topic}: {err}"));
    }
}

/// No-op sender, for exercising the services without an event endpoint.
impl EventSender for () {
    fn send(&self, _event: impl Event) {}
}

pub(crate) trait ToTimestamp {
    fn to_timestamp(self) -> Timestamp;
}

impl ToTimestamp for DateTime<Utc> {
    fn to_timestamp(self) -> Timestamp {
        Timestamp {
            seconds: self.timestamp(),
            nanos: self.timestamp_subsec_nanos() as i32,
            ..Default::default()
        }
    }
}
