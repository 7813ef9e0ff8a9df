//! Drive the async retry loop to completion on the calling thread.

use std::future::Future;
use std::io;
use std::{panic, thread};
use tokio::runtime::{Builder, Handle, RuntimeFlavor};

/// Block the current thread until `future` completes.
///
/// - Outside any runtime: a current-thread runtime with timers is built for
///   this call.
/// - Inside a multi-thread runtime: the worker is handed off with
///   `block_in_place` and the future runs on the existing runtime.
/// - Inside any other runtime (a current-thread runtime, or one of its
///   `spawn_blocking` threads): a fresh runtime drives the future on a scoped
///   helper thread while the caller waits for it.
pub(crate) fn block_on<F>(future: F) -> io::Result<F::Output>
where
    F: Future + Send,
    F::Output: Send,
{
    match Handle::try_current() {
        Ok(handle) => match handle.runtime_flavor() {
            RuntimeFlavor::MultiThread => {
                Ok(tokio::task::block_in_place(|| handle.block_on(future)))
            }
            _ => thread::scope(|scope| {
                match scope.spawn(move || run_on_fresh_runtime(future)).join() {
                    Ok(output) => output,
                    Err(payload) => panic::resume_unwind(payload),
                }
            }),
        },
        Err(_) => run_on_fresh_runtime(future),
    }
}

fn run_on_fresh_runtime<F: Future>(future: F) -> io::Result<F::Output> {
    let runtime = Builder::new_current_thread().enable_time().build()?;
    Ok(runtime.block_on(future))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_builds_runtime_when_none_is_running() {
        let value = block_on(async {
            tokio::time::sleep(Duration::from_millis(1)).await;
            5
        })
        .unwrap();

        assert_eq!(value, 5);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_reuses_multi_thread_runtime() {
        let value = block_on(async {
            tokio::time::sleep(Duration::from_millis(1)).await;
            "done"
        })
        .unwrap();

        assert_eq!(value, "done");
    }

    #[tokio::test]
    async fn test_current_thread_runtime_uses_helper_thread() {
        let caller = thread::current().id();
        let (value, worker) = block_on(async {
            tokio::time::sleep(Duration::from_millis(1)).await;
            (7, thread::current().id())
        })
        .unwrap();

        assert_eq!(value, 7);
        assert_ne!(worker, caller);
    }

    #[tokio::test]
    async fn test_spawn_blocking_thread_of_current_thread_runtime() {
        let value = tokio::task::spawn_blocking(|| {
            block_on(async {
                tokio::time::sleep(Duration::from_millis(1)).await;
                "blocked"
            })
        })
        .await
        .unwrap()
        .unwrap();

        assert_eq!(value, "blocked");
    }

    #[test]
    #[should_panic(expected = "attempt exploded")]
    fn test_helper_thread_panic_reaches_caller() {
        let runtime = Builder::new_current_thread().build().unwrap();
        let _guard = runtime.enter();

        let _: io::Result<()> = block_on(async { panic!("attempt exploded") });
    }
}
