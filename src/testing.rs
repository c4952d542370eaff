//! Test doubles shared by the unit test suites

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::fetch::{FetchError, FetchResponse, Fetcher};

type Reply = Result<FetchResponse, FetchError>;

enum Scripted {
    Ready(Reply),
    Gated(oneshot::Receiver<Reply>),
}

/// Fetcher answering from scripted replies.
///
/// A ready reply that is the last one queued for its URL is reused, so a
/// single `respond` serves any number of requests. Gated replies stay in
/// flight until the test sends through the returned channel.
#[derive(Default)]
pub(crate) struct StubFetcher {
    routes: RefCell<HashMap<String, VecDeque<Scripted>>>,
    requests: RefCell<Vec<String>>,
}

impl StubFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn push(&self, url: &str, reply: Scripted) {
        self.routes
            .borrow_mut()
            .entry(url.to_string())
            .or_default()
            .push_back(reply);
    }

    pub(crate) fn respond(&self, url: &str, status: u16, body: &str) -> &Self {
        self.push(url, Scripted::Ready(Ok(FetchResponse::new(status, body))));
        self
    }

    pub(crate) fn fail(&self, url: &str, error: FetchError) -> &Self {
        self.push(url, Scripted::Ready(Err(error)));
        self
    }

    /// Queue a reply the test releases later
    pub(crate) fn gate(&self, url: &str) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.push(url, Scripted::Gated(rx));
        tx
    }

    /// URLs requested so far, in order
    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

#[async_trait(?Send)]
impl Fetcher for StubFetcher {
    async fn get(&self, url: &str) -> Result<FetchResponse, FetchError> {
        self.requests.borrow_mut().push(url.to_string());

        let next = {
            let mut routes = self.routes.borrow_mut();
            let queue = routes.get_mut(url);
            match queue {
                Some(queue) => {
                    let next = queue.pop_front();
                    if let Some(Scripted::Ready(reply)) = &next {
                        if queue.is_empty() {
                            queue.push_back(Scripted::Ready(reply.clone()));
                        }
                    }
                    next
                }
                None => None,
            }
        };

        match next {
            Some(Scripted::Ready(reply)) => reply,
            Some(Scripted::Gated(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(FetchError::Network("reply dropped".into()))),
            None => Err(FetchError::Network(format!("no route for {}", url))),
        }
    }
}
