use anyhow::Result;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::{
    application::{interfaces::clock::Clock, usecases::posts::PostUseCase},
    domain::{
        entities::posts::PostEntity,
        repositories::{
            posts::PostRepository, social_accounts::SocialAccountRepository,
            subscribers::SubscriberRepository, usage::UsageRepository,
        },
        value_objects::{
            posts::{PostDto, ProcessSummary, ProcessedPost, QueueEntry, QueueView},
            schedules::{
                ParseOutcome, ScheduledCounts, is_due, parse_scheduled_at, seconds_until_due,
            },
        },
    },
};

pub const DEFAULT_BATCH_SIZE: i64 = 100;

/// Due-time bookkeeping over scheduled posts. Publishing goes through the post
/// lifecycle so both paths produce identical results.
pub struct SchedulerUseCase<P, A, S, U, C>
where
    P: PostRepository + Send + Sync + 'static,
    A: SocialAccountRepository + Send + Sync + 'static,
    S: SubscriberRepository + Send + Sync + 'static,
    U: UsageRepository + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    post_repository: Arc<P>,
    post_usecase: Arc<PostUseCase<P, A, S, U, C>>,
    clock: Arc<C>,
    batch_size: i64,
}

impl<P, A, S, U, C> SchedulerUseCase<P, A, S, U, C>
where
    P: PostRepository + Send + Sync + 'static,
    A: SocialAccountRepository + Send + Sync + 'static,
    S: SubscriberRepository + Send + Sync + 'static,
    U: UsageRepository + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    pub fn new(
        post_repository: Arc<P>,
        post_usecase: Arc<PostUseCase<P, A, S, U, C>>,
        clock: Arc<C>,
        batch_size: i64,
    ) -> Self {
        Self {
            post_repository,
            post_usecase,
            clock,
            batch_size: if batch_size > 0 {
                batch_size
            } else {
                DEFAULT_BATCH_SIZE
            },
        }
    }

    pub async fn scheduler_queue(&self, owner_id: Uuid) -> Result<QueueView> {
        self.due_queue(owner_id, self.clock.now()).await
    }

    /// The queue lists at most one batch, earliest first. The counts cover every
    /// scheduled post of the owner.
    pub async fn due_queue(&self, owner_id: Uuid, now: DateTime<Utc>) -> Result<QueueView> {
        let scheduled = self.load_scheduled(owner_id).await?;
        let counts = self.count_scheduled(owner_id, now).await?;

        let mut queue: Vec<QueueEntry> = timed_posts(scheduled)
            .into_iter()
            .map(|(post, at)| QueueEntry {
                post_id: post.id,
                title: post.title,
                platforms: post.platforms,
                scheduled_at: at,
                is_due: is_due(at, now),
                time_until_due_seconds: seconds_until_due(at, now),
            })
            .collect();
        queue.sort_by_key(|entry| entry.scheduled_at);

        let total_scheduled = usize::try_from(counts.parsable)?;
        let due_now = usize::try_from(counts.due)?;

        debug!(
            %owner_id,
            total_scheduled,
            due_now,
            listed = queue.len(),
            "scheduler: queue built"
        );

        Ok(QueueView {
            total_scheduled,
            due_now,
            queue,
        })
    }

    pub async fn pending_due_posts(&self, owner_id: Uuid) -> Result<Vec<PostDto>> {
        let now = self.clock.now();
        let due = self.load_due(owner_id, now).await?;

        Ok(due.into_iter().map(|(post, _)| PostDto::from(post)).collect())
    }

    pub async fn scheduler_process(&self, owner_id: Uuid) -> Result<ProcessSummary> {
        self.process_due(owner_id, self.clock.now()).await
    }

    /// Publishes every due post of the owner. A failure on one post is logged and
    /// counted and never aborts the rest of the batch.
    pub async fn process_due(&self, owner_id: Uuid, now: DateTime<Utc>) -> Result<ProcessSummary> {
        let due = self.load_due(owner_id, now).await?;
        let counts = self.count_scheduled(owner_id, now).await?;

        let skipped_count = usize::try_from(counts.total)?.saturating_sub(due.len());
        let mut results = Vec::with_capacity(due.len());
        let mut failed_count = 0;

        for (post, _) in due {
            match self.post_usecase.publish(&post, now).await {
                Ok(published) => results.push(ProcessedPost {
                    post_id: published.id,
                    title: published.title,
                    platforms: published.platforms,
                    published_at: now,
                }),
                Err(err) => {
                    failed_count += 1;
                    error!(
                        %owner_id,
                        post_id = %post.id,
                        error = %err,
                        "scheduler: failed to publish due post"
                    );
                }
            }
        }

        let published_count = results.len();
        info!(
            %owner_id,
            published_count,
            skipped_count,
            failed_count,
            "scheduler: due posts processed"
        );

        Ok(ProcessSummary {
            message: format!("Processed {} scheduled post(s)", published_count),
            published_count,
            skipped_count,
            failed_count,
            results,
        })
    }

    /// Runs `process_due` for every owner holding due posts, one page of owners at a
    /// time.
    pub async fn process_all_due(&self) -> Result<ProcessSummary> {
        let now = self.clock.now();

        let mut summary = ProcessSummary {
            message: String::new(),
            published_count: 0,
            skipped_count: 0,
            failed_count: 0,
            results: Vec::new(),
        };

        let mut after = None;
        loop {
            let owners = self
                .post_repository
                .list_owners_with_due(now, after, self.batch_size)
                .await?;
            let page_len = owners.len();

            for owner_id in owners {
                after = Some(owner_id);
                match self.process_due(owner_id, now).await {
                    Ok(owner_summary) => {
                        summary.published_count += owner_summary.published_count;
                        summary.skipped_count += owner_summary.skipped_count;
                        summary.failed_count += owner_summary.failed_count;
                        summary.results.extend(owner_summary.results);
                    }
                    Err(err) => {
                        summary.failed_count += 1;
                        error!(
                            %owner_id,
                            db_error = ?err,
                            "scheduler: failed to process owner"
                        );
                    }
                }
            }

            if (page_len as i64) < self.batch_size {
                break;
            }
        }

        summary.message = format!("Processed {} scheduled post(s)", summary.published_count);
        Ok(summary)
    }

    /// Due posts paired with their parsed time, earliest first.
    async fn load_due(
        &self,
        owner_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<(PostEntity, DateTime<Utc>)>> {
        let due = self
            .post_repository
            .list_due(owner_id, now, self.batch_size)
            .await
            .inspect_err(|err| {
                error!(
                    %owner_id,
                    db_error = ?err,
                    "scheduler: failed to load due posts"
                );
            })?;

        let mut due: Vec<(PostEntity, DateTime<Utc>)> = timed_posts(due)
            .into_iter()
            .filter(|(_, at)| is_due(*at, now))
            .collect();
        due.sort_by_key(|(_, at)| *at);

        Ok(due)
    }

    async fn count_scheduled(
        &self,
        owner_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<ScheduledCounts> {
        self.post_repository
            .count_scheduled(owner_id, now)
            .await
            .inspect_err(|err| {
                error!(
                    %owner_id,
                    db_error = ?err,
                    "scheduler: failed to count scheduled posts"
                );
            })
    }

    async fn load_scheduled(&self, owner_id: Uuid) -> Result<Vec<PostEntity>> {
        self.post_repository
            .list_scheduled(owner_id, self.batch_size)
            .await
            .inspect_err(|err| {
                error!(
                    %owner_id,
                    db_error = ?err,
                    "scheduler: failed to load scheduled posts"
                );
            })
    }
}

/// Pairs each post with its parsed due time, dropping the ones that do not parse.
fn timed_posts(posts: Vec<PostEntity>) -> Vec<(PostEntity, DateTime<Utc>)> {
    posts
        .into_iter()
        .filter_map(|post| {
            let raw = post.scheduled_at.as_deref()?;
            match parse_scheduled_at(raw) {
                ParseOutcome::Parsed(at) => Some((post, at)),
                ParseOutcome::Skip { raw, reason } => {
                    warn!(
                        post_id = %post.id,
                        scheduled_at = %raw,
                        %reason,
                        "scheduler: skipping post with unparsable scheduled_at"
                    );
                    None
                }
            }
        })
        .collect()
}
