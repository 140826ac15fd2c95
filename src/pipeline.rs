//! Pipeline driver: parse, reconcile, scan and publish, one card at a time.
//!
//! Each card ends either `Published` or `Skipped` at the stage that failed.
//! Per-card failures are recorded and logged here and never stop the run;
//! only failing to fetch the card list does.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info};

use crate::cards::{CardSource, CardSourceError};
use crate::discovery::{DiscoveryError, Scanner};
use crate::events::EventPublisher;
use crate::models::{Card, MediaDescriptor};
use crate::parser::{self, ParseError};
use crate::reconcile::{Reconciled, Reconciler, ReconcileError};

/// Last stage a skipped card completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetched,
    Parsed,
    Reconciled,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Fetched => "fetched",
            Stage::Parsed => "parsed",
            Stage::Reconciled => "reconciled",
        };
        f.write_str(name)
    }
}

/// Why a card was skipped.
#[derive(Debug, Error)]
pub enum SkipReason {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
}

impl SkipReason {
    /// Intentional skips (season sub-cards) are not failures.
    pub fn is_failure(&self) -> bool {
        !matches!(self, SkipReason::Parse(e) if e.is_redundant())
    }
}

#[derive(Debug)]
pub enum CardOutcome {
    Published {
        media_id: String,
        reconciled: Reconciled,
        published: usize,
        failed: usize,
    },
    Skipped {
        /// Last stage the card completed.
        stage: Stage,
        reason: SkipReason,
    },
}

#[derive(Debug)]
pub struct CardReport {
    pub card_id: String,
    pub card_name: String,
    pub outcome: CardOutcome,
}

/// Outcome of a whole run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub reports: Vec<CardReport>,
}

impl RunSummary {
    pub fn cards(&self) -> usize {
        self.reports.len()
    }

    pub fn published_cards(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| matches!(r.outcome, CardOutcome::Published { .. }))
            .count()
    }

    pub fn skipped_cards(&self) -> usize {
        self.cards() - self.published_cards()
    }

    /// Skips other than season sub-cards.
    pub fn failed_cards(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| matches!(&r.outcome, CardOutcome::Skipped { reason, .. } if reason.is_failure()))
            .count()
    }

    pub fn events_published(&self) -> usize {
        self.reports
            .iter()
            .map(|r| match r.outcome {
                CardOutcome::Published { published, .. } => published,
                CardOutcome::Skipped { .. } => 0,
            })
            .sum()
    }

    pub fn events_failed(&self) -> usize {
        self.reports
            .iter()
            .map(|r| match r.outcome {
                CardOutcome::Published { failed, .. } => failed,
                CardOutcome::Skipped { .. } => 0,
            })
            .sum()
    }
}

pub struct Pipeline {
    cards: Arc<dyn CardSource>,
    reconciler: Reconciler,
    scanner: Scanner,
    publisher: EventPublisher,
}

impl Pipeline {
    pub fn new(
        cards: Arc<dyn CardSource>,
        reconciler: Reconciler,
        scanner: Scanner,
        publisher: EventPublisher,
    ) -> Self {
        Self {
            cards,
            reconciler,
            scanner,
            publisher,
        }
    }

    /// Process every card on the list.
    ///
    /// Only a failure to fetch the list or its cards is returned as an error.
    pub async fn run(&self) -> Result<RunSummary, CardSourceError> {
        let list = self.cards.list().await?;
        info!("listing cards in list '{}' (id: {})", list.name, list.id);

        let cards = self.cards.cards().await?;
        let mut summary = RunSummary::default();

        for card in &cards {
            let outcome = self.process_card(card).await;
            log_outcome(card, &outcome);
            summary.reports.push(CardReport {
                card_id: card.id.clone(),
                card_name: card.name.clone(),
                outcome,
            });
        }

        info!(
            "run finished: {} cards, {} published, {} skipped ({} failed), {} events sent, {} events failed",
            summary.cards(),
            summary.published_cards(),
            summary.skipped_cards(),
            summary.failed_cards(),
            summary.events_published(),
            summary.events_failed()
        );
        Ok(summary)
    }

    /// Drive one card through every stage.
    pub async fn process_card(&self, card: &Card) -> CardOutcome {
        let descriptor = match parser::parse_card(card) {
            Ok(descriptor) => descriptor,
            Err(e) => return skipped(Stage::Fetched, e),
        };
        log_descriptor(&descriptor);

        let (media_id, reconciled) = match self
            .reconciler
            .reconcile_detailed(&card.id, &descriptor)
            .await
        {
            Ok(result) => result,
            Err(e) => return skipped(Stage::Parsed, e),
        };

        let events = match self
            .scanner
            .discover(descriptor.media_kind, &media_id, &descriptor.name)
            .await
        {
            Ok(events) => events,
            Err(e) => return skipped(Stage::Reconciled, e),
        };

        let outcomes = self.publisher.publish(&events).await;
        let failed = outcomes.iter().filter(|o| o.is_err()).count();

        CardOutcome::Published {
            media_id,
            reconciled,
            published: outcomes.len() - failed,
            failed,
        }
    }
}

fn skipped(stage: Stage, reason: impl Into<SkipReason>) -> CardOutcome {
    CardOutcome::Skipped {
        stage,
        reason: reason.into(),
    }
}

fn log_descriptor(descriptor: &MediaDescriptor) {
    info!(
        "processing card: name='{}',type={},provider='{}',provider_id={},source={},source_uri={}",
        descriptor.name,
        descriptor.media_kind.as_str(),
        descriptor.metadata_provider.as_str(),
        descriptor.metadata_id,
        descriptor.source_type.as_str(),
        truncate(&descriptor.source_uri, 20)
    );
}

fn log_outcome(card: &Card, outcome: &CardOutcome) {
    match outcome {
        CardOutcome::Published {
            media_id,
            published,
            failed,
            ..
        } => info!(
            "card '{}' done (media id: {}): {} events published, {} failed",
            card.name, media_id, published, failed
        ),
        CardOutcome::Skipped { reason, .. } if !reason.is_failure() => {
            info!("skipping redundant season card '{}'", card.name)
        }
        CardOutcome::Skipped { stage, reason } => {
            error!("skipping card '{}' after {}: {}", card.name, stage, reason)
        }
    }
}

/// First `max` characters of `s`.
fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
