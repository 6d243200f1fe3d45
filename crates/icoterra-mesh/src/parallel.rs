//! Fork-join helpers over a scoped worker pool.
//!
//! Tasks go through a bounded crossbeam channel to a fixed set of scoped
//! threads. Every call joins all of its workers before returning, so nothing
//! from a stage outlives it.

use std::thread;

use crate::MeshError;

/// Worker count to use for a requested value; `0` means one per logical CPU.
pub fn resolve_workers(requested: usize) -> usize {
    if requested == 0 {
        num_cpus::get().max(1)
    } else {
        requested
    }
}

/// Run `f(0..tasks)` on up to `workers` threads and return the results in task order.
///
/// If any task fails, the error of the lowest failing task index is
/// returned. All workers are joined first either way.
///
/// # Errors
///
/// Returns the first task error, [`MeshError::WorkerSpawn`] if a thread cannot
/// be started, or [`MeshError::WorkerPanicked`] if one panics.
pub fn fork_join<R, E, F>(
    stage: &'static str,
    workers: usize,
    tasks: usize,
    f: F,
) -> Result<Vec<R>, E>
where
    R: Send,
    E: From<MeshError> + Send,
    F: Fn(usize) -> Result<R, E> + Sync,
{
    run_pool(stage, workers, 0..tasks, f)
}

/// Apply `f` to consecutive batches of `items` on up to `workers` threads.
///
/// `f` receives the offset of its batch's first item and the batch itself.
/// Batches are disjoint, so workers never contend on an item.
///
/// # Errors
///
/// Same as [`fork_join`]; the error of the lowest failing batch wins.
pub fn fork_join_mut<T, E, F>(
    stage: &'static str,
    workers: usize,
    items: &mut [T],
    batch_size: usize,
    f: F,
) -> Result<(), E>
where
    T: Send,
    E: From<MeshError> + Send,
    F: Fn(usize, &mut [T]) -> Result<(), E> + Sync,
{
    let batch_size = batch_size.max(1);
    let batches = items.chunks_mut(batch_size).enumerate();
    run_pool(stage, workers, batches, |(i, batch)| f(i * batch_size, batch))?;
    Ok(())
}

/// Feed `jobs` to a scoped pool, join it, and collect results in job order.
fn run_pool<J, R, E, F>(
    stage: &'static str,
    workers: usize,
    jobs: impl ExactSizeIterator<Item = J>,
    f: F,
) -> Result<Vec<R>, E>
where
    J: Send,
    R: Send,
    E: From<MeshError> + Send,
    F: Fn(J) -> Result<R, E> + Sync,
{
    let count = jobs.len();
    if count == 0 {
        return Ok(Vec::new());
    }
    let workers = resolve_workers(workers).min(count);

    let (task_tx, task_rx) = crossbeam_channel::bounded::<(usize, J)>(count);
    let (result_tx, result_rx) = crossbeam_channel::unbounded::<(usize, Result<R, E>)>();
    for job in jobs.enumerate() {
        // The channel holds every job and the receiver is still alive.
        let _ = task_tx.send(job);
    }
    drop(task_tx);

    thread::scope(|scope| -> Result<(), E> {
        let mut handles = Vec::with_capacity(workers);
        for _ in 0..workers {
            let rx = task_rx.clone();
            let tx = result_tx.clone();
            let f = &f;
            let handle = thread::Builder::new()
                .name("icoterra-worker".into())
                .spawn_scoped(scope, move || {
                    while let Ok((i, job)) = rx.recv() {
                        let _ = tx.send((i, f(job)));
                    }
                })
                .map_err(|source| MeshError::WorkerSpawn { stage, source })?;
            handles.push(handle);
        }

        let mut panicked = false;
        for handle in handles {
            panicked |= handle.join().is_err();
        }
        if panicked {
            return Err(MeshError::WorkerPanicked { stage }.into());
        }
        Ok(())
    })?;
    drop(result_tx);

    let mut slots: Vec<Option<Result<R, E>>> = (0..count).map(|_| None).collect();
    for (i, result) in result_rx.try_iter() {
        slots[i] = Some(result);
    }

    let mut out = Vec::with_capacity(count);
    for slot in slots {
        match slot {
            Some(Ok(r)) => out.push(r),
            Some(Err(e)) => return Err(e),
            None => return Err(MeshError::WorkerPanicked { stage }.into()),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_workers() {
        assert!(resolve_workers(0) >= 1);
        assert_eq!(resolve_workers(3), 3);
    }

    #[test]
    fn test_fork_join_preserves_order() {
        let out: Vec<usize> = fork_join::<_, MeshError, _>("test", 4, 50, |i| Ok(i * i)).unwrap();
        assert_eq!(out, (0..50).map(|i| i * i).collect::<Vec<_>>());
    }

    #[test]
    fn test_fork_join_empty() {
        let out: Vec<u8> = fork_join::<_, MeshError, _>("test", 4, 0, |_| Ok(1)).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_fork_join_reports_lowest_failing_task() {
        let err = fork_join::<(), MeshError, _>("test", 3, 20, |i| {
            if i == 7 || i == 15 {
                Err(MeshError::UnmatchedEdges { face: i, matched: 0 })
            } else {
                Ok(())
            }
        })
        .unwrap_err();
        assert!(matches!(err, MeshError::UnmatchedEdges { face: 7, .. }));
    }

    #[test]
    fn test_fork_join_catches_panics() {
        let err = fork_join::<(), MeshError, _>("boom", 2, 4, |i| {
            if i == 2 {
                panic!("task failed");
            }
            Ok(())
        })
        .unwrap_err();
        assert!(matches!(err, MeshError::WorkerPanicked { stage: "boom" }));
    }

    #[test]
    fn test_fork_join_mut_covers_every_item_once() {
        let mut items = vec![0usize; 1003];
        fork_join_mut::<_, MeshError, _>("test", 4, &mut items, 100, |offset, batch| {
            for (k, item) in batch.iter_mut().enumerate() {
                *item += offset + k;
            }
            Ok(())
        })
        .unwrap();
        assert_eq!(items, (0..1003).collect::<Vec<_>>());
    }

    #[test]
    fn test_fork_join_mut_single_worker() {
        let mut items = vec![1u32; 10];
        fork_join_mut::<_, MeshError, _>("test", 1, &mut items, 3, |_, batch| {
            batch.iter_mut().for_each(|x| *x *= 2);
            Ok(())
        })
        .unwrap();
        assert!(items.iter().all(|&x| x == 2));
    }

    #[test]
    fn test_fork_join_mut_empty_and_panicking_batches() {
        let mut empty: Vec<u8> = Vec::new();
        fork_join_mut::<_, MeshError, _>("test", 2, &mut empty, 4, |_, _| Ok(())).unwrap();

        let mut items = vec![0u8; 12];
        let err = fork_join_mut::<_, MeshError, _>("boom", 3, &mut items, 4, |offset, _| {
            if offset == 8 {
                panic!("batch failed");
            }
            Ok(())
        })
        .unwrap_err();
        assert!(matches!(err, MeshError::WorkerPanicked { stage: "boom" }));
    }

    #[test]
    fn test_fork_join_mut_error() {
        let mut items = vec![0u8; 10];
        let err = fork_join_mut::<_, MeshError, _>("test", 2, &mut items, 2, |offset, _| {
            if offset >= 4 {
                Err(MeshError::InvalidRadius(offset as f64))
            } else {
                Ok(())
            }
        })
        .unwrap_err();
        assert!(matches!(err, MeshError::InvalidRadius(r) if r == 4.0));
    }
}
