//! Offline fallback responder.
//!
//! When the live collaborator is unreachable or errors, the interface must
//! stay usable: the user always gets a reply. This module holds that
//! degraded-mode contract as an explicit finite table of keyword rules tried
//! in order, first match wins, with a default entry that always matches.

use crate::backend::{ChatBackend, ChatReply, ChatStreamEvent, ChatTurn};
use async_trait::async_trait;
use rulenav_core::citation::{Citation, HighlightRange};
use rulenav_core::error::Result;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

/// Delay before a canned reply completes, so the loading indicator does not
/// flash for a single frame.
const DEFAULT_RESPONSE_DELAY: Duration = Duration::from_millis(600);

/// How many space-delimited words go into one simulated stream fragment.
const STREAM_CHUNK_WORDS: usize = 5;

/// A canned citation pointing at a well-known fallback document page.
struct CannedCitation {
    document_id: &'static str,
    document_name: &'static str,
    page_number: u32,
    excerpt: &'static str,
}

impl CannedCitation {
    fn to_citation(&self) -> Citation {
        Citation {
            id: format!("fallback-{}", self.document_id),
            document_id: self.document_id.to_string(),
            document_name: Some(self.document_name.to_string()),
            page_number: self.page_number,
            highlight_range: HighlightRange::for_excerpt(self.excerpt),
            excerpt: self.excerpt.to_string(),
            relevance_score: None,
            positions: Vec::new(),
            pdf_url: None,
        }
    }
}

/// One row of the fallback table: a keyword predicate, the canned answer,
/// and zero or one canned citation.
struct FallbackRule {
    /// Lowercased substrings; any hit selects this rule. Empty matches all
    /// (the default entry).
    keywords: &'static [&'static str],
    content: &'static str,
    citation: Option<CannedCitation>,
}

impl FallbackRule {
    fn matches(&self, lowercased: &str) -> bool {
        self.keywords.is_empty() || self.keywords.iter().any(|k| lowercased.contains(k))
    }
}

/// Ordered rule table. The default entry is last and always present.
const RULES: &[FallbackRule] = &[
    FallbackRule {
        keywords: &["position limit", "position limits", "accountability"],
        content: "Speculative position limits are set out in Rule 432 and the \
position limit tables of the CME rulebook. A market participant may not own or \
control more than the specified number of contracts net long or net short, \
unless an exemption (such as a bona fide hedging exemption) has been granted. \
Exceeding a limit without an exemption is a rule violation.",
        citation: Some(CannedCitation {
            document_id: "CME-Position-Limits",
            document_name: "CME Position Limits",
            page_number: 1,
            excerpt: "No person shall own or control positions in excess of the \
limits set forth in the Position Limit, Position Accountability and Reportable \
Level Table.",
        }),
    },
    FallbackRule {
        keywords: &["margin", "performance bond", "collateral"],
        content: "Margin (performance bond) requirements are established by the \
clearing house and set out in the performance bond chapter of the CME rulebook. \
Clearing members must collect at least the minimum performance bond from each \
account and maintain it while positions remain open; requirements scale with \
the risk of the portfolio.",
        citation: Some(CannedCitation {
            document_id: "CME-Margin-Requirements",
            document_name: "CME Margin Requirements",
            page_number: 1,
            excerpt: "Clearing members shall collect performance bond from each \
account at no less than the minimums established by the Clearing House.",
        }),
    },
    FallbackRule {
        keywords: &["delivery", "settlement", "physical"],
        content: "Delivery procedures are governed by the delivery chapter of \
the CME rulebook. The short clearing member initiates delivery by tendering a \
notice of intent; the clearing house assigns it to the oldest long position, \
and delivery is completed against payment on the scheduled delivery day.",
        citation: Some(CannedCitation {
            document_id: "CME-Delivery-Procedures",
            document_name: "CME Delivery Procedures",
            page_number: 1,
            excerpt: "The clearing member carrying the short position shall \
tender a notice of intention to deliver to the Clearing House.",
        }),
    },
    // Default entry: no keywords, matches everything.
    FallbackRule {
        keywords: &[],
        content: "I can help you navigate the CME rulebook. Try asking about \
position limits, margin requirements, or delivery procedures. (The live \
answering service is currently unavailable, so answers are limited to these \
topics.)",
        citation: None,
    },
];

/// Chat backend serving canned answers from the keyword table.
///
/// Implements both collaborator shapes so it can stand in for the live
/// backend anywhere, including the streaming path.
#[derive(Clone)]
pub struct FallbackBackend {
    delay: Duration,
}

impl FallbackBackend {
    pub fn new() -> Self {
        Self {
            delay: DEFAULT_RESPONSE_DELAY,
        }
    }

    /// Overrides the simulated delay. Tests pass `Duration::ZERO`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn lookup(content: &str) -> &'static FallbackRule {
        let lowercased = content.to_lowercase();
        RULES
            .iter()
            .find(|rule| rule.matches(&lowercased))
            // The default entry matches everything.
            .unwrap_or(&RULES[RULES.len() - 1])
    }

    /// Produces the canned reply for a turn, after the simulated delay.
    ///
    /// Never fails; this is the anchor of the "user always gets a reply"
    /// contract.
    pub async fn respond(&self, turn: &ChatTurn) -> ChatReply {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let rule = Self::lookup(&turn.content);
        let citations = rule
            .citation
            .as_ref()
            .map(|c| vec![c.to_citation()])
            .unwrap_or_default();

        ChatReply {
            message: rule.content.to_string(),
            citations,
            session_id: turn
                .session_id
                .clone()
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
        }
    }
}

impl Default for FallbackBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatBackend for FallbackBackend {
    async fn send_message(&self, turn: ChatTurn) -> Result<ChatReply> {
        Ok(self.respond(&turn).await)
    }

    async fn stream_message(
        &self,
        turn: ChatTurn,
        events: UnboundedSender<ChatStreamEvent>,
        cancel: CancellationToken,
    ) -> Result<()> {
        let reply = tokio::select! {
            _ = cancel.cancelled() => return Ok(()),
            reply = self.respond(&turn) => reply,
        };

        if !reply.citations.is_empty()
            && events
                .send(ChatStreamEvent::Citations(reply.citations))
                .is_err()
        {
            return Ok(());
        }

        // Word-chunked fragments whose concatenation equals the full answer.
        let words: Vec<&str> = reply.message.split_inclusive(' ').collect();
        for chunk in words.chunks(STREAM_CHUNK_WORDS) {
            if cancel.is_cancelled() {
                return Ok(());
            }
            if events
                .send(ChatStreamEvent::Content(chunk.concat()))
                .is_err()
            {
                return Ok(());
            }
        }

        let _ = events.send(ChatStreamEvent::Done {
            session_id: reply.session_id,
        });
        Ok(())
    }
}
