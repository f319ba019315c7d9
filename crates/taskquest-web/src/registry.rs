//! 연결된 앱 창 레지스트리.
//!
//! 포그라운드 앱 창은 SSE 스트림(`/api/clients/stream`)을 열어 자신을 등록하고,
//! 스트림이 닫히면 자동으로 등록 해제된다. 포커스 요청은 해당 창의 스트림으로 전달된다.

use futures::stream::Stream;
use parking_lot::RwLock;
use serde::Serialize;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use taskquest_core::error::CoreError;
use taskquest_core::ports::window::WindowClient;
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

/// 창으로 전달되는 이벤트
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientEvent {
    /// 창을 앞으로 가져오기
    Focus,
}

impl ClientEvent {
    /// SSE 이벤트 이름
    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::Focus => "focus",
        }
    }
}

struct ClientEntry {
    id: String,
    url: String,
    tx: mpsc::UnboundedSender<ClientEvent>,
}

/// 창 레지스트리 (등록 순서 유지)
#[derive(Clone, Default)]
pub struct ClientRegistry {
    entries: Arc<RwLock<Vec<ClientEntry>>>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 창 등록: 클라이언트 ID와 이벤트 수신 채널 반환
    pub fn register(&self, url: impl Into<String>) -> (String, mpsc::UnboundedReceiver<ClientEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = Uuid::new_v4().to_string();
        let url = url.into();

        debug!("창 등록: {id} ({url})");
        self.entries.write().push(ClientEntry {
            id: id.clone(),
            url,
            tx,
        });
        (id, rx)
    }

    /// 창 등록 해제: 존재했으면 true
    pub fn unregister(&self, id: &str) -> bool {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|e| e.id != id);
        let removed = entries.len() != before;
        if removed {
            debug!("창 등록 해제: {id}");
        }
        removed
    }

    /// 살아 있는 창 목록 (등록 순서)
    pub fn list(&self) -> Vec<WindowClient> {
        let mut entries = self.entries.write();
        entries.retain(|e| !e.tx.is_closed());
        entries
            .iter()
            .map(|e| WindowClient {
                id: e.id.clone(),
                url: e.url.clone(),
            })
            .collect()
    }

    /// 창에 포커스 이벤트 전송
    pub fn focus(&self, id: &str) -> Result<(), CoreError> {
        let sent = {
            let entries = self.entries.read();
            entries
                .iter()
                .find(|e| e.id == id)
                .map(|e| e.tx.send(ClientEvent::Focus).is_ok())
        };

        match sent {
            Some(true) => Ok(()),
            Some(false) => {
                self.unregister(id);
                Err(not_found(id))
            }
            None => Err(not_found(id)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn not_found(id: &str) -> CoreError {
    CoreError::NotFound {
        resource_type: "Window".to_string(),
        id: id.to_string(),
    }
}

/// drop 시 창 등록을 해제하는 가드 (SSE 스트림 수명과 연결)
pub struct Registration {
    registry: ClientRegistry,
    id: String,
}

impl Registration {
    pub fn new(registry: ClientRegistry, id: String) -> Self {
        Self { registry, id }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// 스트림에 등록을 묶는다. 스트림이 drop되면 등록도 해제된다.
    pub fn attach<S>(self, stream: S) -> RegisteredStream<S> {
        RegisteredStream {
            inner: stream,
            registration: self,
        }
    }
}

/// 등록 수명이 묶인 스트림
pub struct RegisteredStream<S> {
    inner: S,
    registration: Registration,
}

impl<S> RegisteredStream<S> {
    pub fn client_id(&self) -> &str {
        self.registration.id()
    }
}

impl<S: Stream + Unpin> Stream for RegisteredStream<S> {
    type Item = S::Item;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.registry.unregister(&self.id);
    }
}
