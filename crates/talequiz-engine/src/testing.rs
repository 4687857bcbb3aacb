//! Scripted backends and reply builders for tests

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use talequiz_llm::{ChatBackend, ChatParams, ConnectivityError, Message};

use crate::labels::{ANSWER_LABEL, MORAL_LABEL, QUESTION_LABEL, TALE_LABEL, marker_for};

type Reply = Result<String, ConnectivityError>;

/// Backend that replays a fixed queue of replies.
///
/// Once the queue is empty every call fails with a transport error, which
/// doubles as an unreachable endpoint.
#[derive(Default)]
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<(Vec<Message>, ChatParams)>>,
    calls: AtomicUsize,
}

impl ScriptedBackend {
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            ..Self::default()
        }
    }

    /// Backend whose every call fails
    #[must_use]
    pub fn unreachable() -> Self {
        Self::default()
    }

    /// Number of `complete` calls so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Messages sent on each call, in order
    pub fn requests(&self) -> Vec<Vec<Message>> {
        self.lock_requests().iter().map(|(m, _)| m.clone()).collect()
    }

    /// Decoding parameters sent on each call, in order
    pub fn params(&self) -> Vec<ChatParams> {
        self.lock_requests().iter().map(|(_, p)| *p).collect()
    }

    fn lock_requests(&self) -> std::sync::MutexGuard<'_, Vec<(Vec<Message>, ChatParams)>> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn complete(&self, messages: Vec<Message>, params: ChatParams) -> Reply {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.lock_requests().push((messages, params));
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| {
                Err(ConnectivityError::Transport(
                    "connection refused".to_string(),
                ))
            })
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// A well-formed story reply
#[must_use]
pub fn story_reply(tale: &str, moral: &str) -> String {
    format!("{TALE_LABEL} {tale}\n{MORAL_LABEL} {moral}\n")
}

/// A well-formed question reply with the answer at `correct`
#[must_use]
pub fn question_reply(question: &str, options: [&str; 4], correct: usize, moral: &str) -> String {
    let mut reply = format!("{QUESTION_LABEL} {question}\n");
    for (i, option) in options.iter().enumerate() {
        reply.push_str(&format!("{}. {option}\n", marker_for(i)));
    }
    reply.push_str(&format!("{ANSWER_LABEL} {}\n", marker_for(correct)));
    reply.push_str(&format!("{MORAL_LABEL} {moral}\n"));
    reply
}
