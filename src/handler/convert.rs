//! Conversions between direct-style and suspend-style handlers.

use std::sync::Arc;

use super::context::Context;
use super::core::{direct_fn, DirectFn, HandlerResult, Next, Resumable, Step, SuspendHandler, Tail};

/// Wrap a suspend-style handler so it can sit in a direct-style chain
///
/// Each `Step::Next` the handler yields runs the downstream chain; only the
/// first one does any work, later ones simply resume the handler.
pub fn suspend_to_direct(handler: Arc<dyn SuspendHandler>) -> Arc<DirectFn> {
    direct_fn(move |ctx, next| {
        let mut task = handler.start();
        let mut next = Some(next);
        loop {
            match task.resume(ctx)? {
                Step::Next => {
                    if let Some(next) = next.take() {
                        next.run(ctx)?;
                    }
                }
                Step::Done => return Ok(()),
            }
        }
    })
}

/// Drive a suspend-style handler to completion
///
/// This is what a cooperative-yield host does with a legacy middleware:
/// resume it, run `downstream` when it yields, resume it again until done.
/// `downstream` runs at most once.
pub fn drive(
    handler: &dyn SuspendHandler,
    ctx: &mut Context,
    downstream: &mut Tail<'_>,
) -> HandlerResult {
    let mut task = handler.start();
    let mut pending = true;
    loop {
        match task.resume(ctx)? {
            Step::Next if pending => {
                pending = false;
                downstream(ctx)?;
            }
            Step::Next => {}
            Step::Done => return Ok(()),
        }
    }
}

/// Expose a direct-style handler as a suspend-style one
///
/// The wrapped handler runs entirely on the first resume. If it invoked its
/// continuation, the task then yields `Step::Next` so the driver runs
/// downstream, and finishes on the following resume. Work a handler does
/// after calling `next` therefore happens before the driver's downstream.
pub fn into_suspend(handler: Arc<DirectFn>) -> Arc<dyn SuspendHandler> {
    Arc::new(DirectAsSuspend { handler })
}

struct DirectAsSuspend {
    handler: Arc<DirectFn>,
}

impl SuspendHandler for DirectAsSuspend {
    fn start(&self) -> Box<dyn Resumable> {
        Box::new(DirectTask {
            handler: Arc::clone(&self.handler),
            state: TaskState::Start,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TaskState {
    Start,
    AwaitingDownstream,
    Finished,
}

struct DirectTask {
    handler: Arc<DirectFn>,
    state: TaskState,
}

impl Resumable for DirectTask {
    fn resume(&mut self, ctx: &mut Context) -> anyhow::Result<Step> {
        match self.state {
            TaskState::Start => {
                let mut downstream = false;
                {
                    let mut tail = |_: &mut Context| -> HandlerResult {
                        downstream = true;
                        Ok(())
                    };
                    (self.handler)(ctx, Next::new(&[], &mut tail))?;
                }
                if downstream {
                    self.state = TaskState::AwaitingDownstream;
                    Ok(Step::Next)
                } else {
                    self.state = TaskState::Finished;
                    Ok(Step::Done)
                }
            }
            TaskState::AwaitingDownstream | TaskState::Finished => {
                self.state = TaskState::Finished;
                Ok(Step::Done)
            }
        }
    }
}
