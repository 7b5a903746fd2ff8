use core::future::Future;

use futures::future::{try_join_all, BoxFuture};
use futures::FutureExt;

/// A group of concurrent fallible tasks joined together.
///
/// Tasks run on the current task, interleaved at their await points, and
/// never outlive the group. Joining yields every result in the order the
/// tasks were added, or the first error observed; the remaining tasks are
/// dropped at that point.
pub struct TaskGroup<'a, T, E> {
    tasks: Vec<BoxFuture<'a, Result<T, E>>>,
}

impl<'a, T, E> TaskGroup<'a, T, E> {
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    pub fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = Result<T, E>> + Send + 'a,
    {
        self.tasks.push(task.boxed());
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub async fn join(self) -> Result<Vec<T>, E> {
        try_join_all(self.tasks).await
    }
}

impl<'a, T, E> Default for TaskGroup<'a, T, E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use core::time::Duration;
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn results_follow_spawn_order() {
        let mut group = TaskGroup::<u32, String>::new();

        group.spawn(async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok(1)
        });
        group.spawn(async { Ok(2) });

        assert_eq!(group.len(), 2);
        assert_eq!(group.join().await.unwrap(), vec![1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn first_error_aborts_the_group() {
        let finished = &AtomicBool::new(false);
        let mut group = TaskGroup::<u32, String>::new();

        group.spawn(async move {
            tokio::time::sleep(Duration::from_secs(10)).await;
            finished.store(true, Ordering::SeqCst);
            Ok(1)
        });
        group.spawn(async { Err("query failed".to_string()) });

        assert_eq!(group.join().await.unwrap_err(), "query failed");
        assert!(!finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn empty_group_joins_to_nothing() {
        let group = TaskGroup::<u32, String>::default();

        assert!(group.is_empty());
        assert!(group.join().await.unwrap().is_empty());
    }
}
