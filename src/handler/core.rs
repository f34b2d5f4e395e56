use std::fmt;
use std::sync::Arc;

use super::context::Context;

/// Outcome of a handler. Errors propagate out of dispatch unchanged.
pub type HandlerResult = anyhow::Result<()>;

/// A direct-style handler: receives the context and the continuation
pub type DirectFn = dyn Fn(&mut Context, Next<'_>) -> HandlerResult + Send + Sync;

/// Terminal continuation invoked after the last handler of a chain
pub type Tail<'a> = dyn FnMut(&mut Context) -> HandlerResult + 'a;

/// Wrap a closure as a shared direct-style handler
pub fn direct_fn<F>(f: F) -> Arc<DirectFn>
where
    F: Fn(&mut Context, Next<'_>) -> HandlerResult + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Continuation handed to each handler
///
/// Calling [`run`](Next::run) executes the rest of the chain and then the
/// surrounding continuation. It is consumed by value, so it can run at most
/// once; dropping it without calling short-circuits everything downstream.
pub struct Next<'a> {
    chain: &'a [Arc<DirectFn>],
    tail: &'a mut Tail<'a>,
}

impl<'a> Next<'a> {
    pub(crate) fn new(chain: &'a [Arc<DirectFn>], tail: &'a mut Tail<'a>) -> Self {
        Self { chain, tail }
    }

    /// Run everything downstream of the current handler
    pub fn run(self, ctx: &mut Context) -> HandlerResult {
        match self.chain.split_first() {
            Some((head, rest)) => head(ctx, Next::new(rest, self.tail)),
            None => (self.tail)(ctx),
        }
    }

    /// Handlers left before the surrounding continuation
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.chain.len()
    }
}

/// What a suspend-style handler asks its driver to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Run downstream, then resume me
    Next,
    /// Finished
    Done,
}

/// One running invocation of a suspend-style handler
pub trait Resumable: Send {
    fn resume(&mut self, ctx: &mut Context) -> anyhow::Result<Step>;
}

/// A suspend-style handler: a resumable computation that yields control back
/// to a driver whenever it wants the downstream chain to run
pub trait SuspendHandler: Send + Sync {
    /// Start a fresh invocation for one request
    fn start(&self) -> Box<dyn Resumable>;
}

/// [`Resumable`] built from a closure
pub struct StepFn<F>(F);

impl<F> Resumable for StepFn<F>
where
    F: FnMut(&mut Context) -> anyhow::Result<Step> + Send,
{
    fn resume(&mut self, ctx: &mut Context) -> anyhow::Result<Step> {
        (self.0)(ctx)
    }
}

/// Build a [`Resumable`] from a closure called once per resume
pub fn step_fn<F>(f: F) -> StepFn<F>
where
    F: FnMut(&mut Context) -> anyhow::Result<Step> + Send,
{
    StepFn(f)
}

struct SuspendFn<F>(F);

impl<F, R> SuspendHandler for SuspendFn<F>
where
    F: Fn() -> R + Send + Sync,
    R: Resumable + 'static,
{
    fn start(&self) -> Box<dyn Resumable> {
        Box::new((self.0)())
    }
}

/// "Before, yield to downstream, after" in suspend style
struct Around<B, A> {
    before: Arc<B>,
    after: Arc<A>,
}

enum AroundState {
    Before,
    After,
    Finished,
}

struct AroundTask<B, A> {
    before: Arc<B>,
    after: Arc<A>,
    state: AroundState,
}

impl<B, A> SuspendHandler for Around<B, A>
where
    B: Fn(&mut Context) -> HandlerResult + Send + Sync + 'static,
    A: Fn(&mut Context) -> HandlerResult + Send + Sync + 'static,
{
    fn start(&self) -> Box<dyn Resumable> {
        Box::new(AroundTask {
            before: Arc::clone(&self.before),
            after: Arc::clone(&self.after),
            state: AroundState::Before,
        })
    }
}

impl<B, A> Resumable for AroundTask<B, A>
where
    B: Fn(&mut Context) -> HandlerResult + Send + Sync,
    A: Fn(&mut Context) -> HandlerResult + Send + Sync,
{
    fn resume(&mut self, ctx: &mut Context) -> anyhow::Result<Step> {
        match self.state {
            AroundState::Before => {
                (self.before)(ctx)?;
                self.state = AroundState::After;
                Ok(Step::Next)
            }
            AroundState::After => {
                self.state = AroundState::Finished;
                (self.after)(ctx)?;
                Ok(Step::Done)
            }
            AroundState::Finished => Ok(Step::Done),
        }
    }
}

/// One unit of request-handling logic in either shape
#[derive(Clone)]
pub enum Handler {
    Direct(Arc<DirectFn>),
    Suspend(Arc<dyn SuspendHandler>),
}

impl Handler {
    /// Direct-style handler from a closure
    ///
    /// ```
    /// use chainrouter::Handler;
    ///
    /// let hello = Handler::direct(|ctx, next| {
    ///     ctx.respond(200, "hello");
    ///     next.run(ctx)
    /// });
    /// assert!(!hello.is_suspend());
    /// ```
    pub fn direct<F>(f: F) -> Self
    where
        F: Fn(&mut Context, Next<'_>) -> HandlerResult + Send + Sync + 'static,
    {
        Handler::Direct(direct_fn(f))
    }

    /// Suspend-style handler from a [`SuspendHandler`] implementation
    pub fn suspend<S>(handler: S) -> Self
    where
        S: SuspendHandler + 'static,
    {
        Handler::Suspend(Arc::new(handler))
    }

    /// Suspend-style handler from a factory producing one [`Resumable`] per request
    pub fn suspend_fn<F, R>(factory: F) -> Self
    where
        F: Fn() -> R + Send + Sync + 'static,
        R: Resumable + 'static,
    {
        Handler::Suspend(Arc::new(SuspendFn(factory)))
    }

    /// Suspend-style handler that runs `before`, yields to downstream, then runs `after`
    pub fn around<B, A>(before: B, after: A) -> Self
    where
        B: Fn(&mut Context) -> HandlerResult + Send + Sync + 'static,
        A: Fn(&mut Context) -> HandlerResult + Send + Sync + 'static,
    {
        Handler::Suspend(Arc::new(Around {
            before: Arc::new(before),
            after: Arc::new(after),
        }))
    }

    #[must_use]
    pub fn is_suspend(&self) -> bool {
        matches!(self, Handler::Suspend(_))
    }

    /// Normalize to direct style
    #[must_use]
    pub fn to_direct(&self) -> Arc<DirectFn> {
        match self {
            Handler::Direct(f) => Arc::clone(f),
            Handler::Suspend(s) => super::convert::suspend_to_direct(Arc::clone(s)),
        }
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::Direct(_) => f.write_str("Handler::Direct"),
            Handler::Suspend(_) => f.write_str("Handler::Suspend"),
        }
    }
}

impl From<Arc<DirectFn>> for Handler {
    fn from(f: Arc<DirectFn>) -> Self {
        Handler::Direct(f)
    }
}

/// An ordered, pre-normalized list of direct-style handlers
#[derive(Clone, Default)]
pub struct Chain {
    handlers: Arc<[Arc<DirectFn>]>,
}

impl Chain {
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Thread `ctx` through every handler, then through `tail`
    pub fn run<'a>(&'a self, ctx: &mut Context, tail: &'a mut Tail<'a>) -> HandlerResult {
        Next::new(&self.handlers, tail).run(ctx)
    }

    /// Run the chain with nothing after it
    pub fn run_to_end(&self, ctx: &mut Context) -> HandlerResult {
        let mut end = |_: &mut Context| -> HandlerResult { Ok(()) };
        self.run(ctx, &mut end)
    }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field("len", &self.handlers.len())
            .finish()
    }
}

/// Normalize and compose handlers into one [`Chain`]
#[must_use]
pub fn compose(handlers: &[Handler]) -> Chain {
    let handlers: Vec<Arc<DirectFn>> = handlers.iter().map(Handler::to_direct).collect();
    Chain {
        handlers: handlers.into(),
    }
}

/// The stub used for resource actions without a controller handler
#[must_use]
pub fn not_implemented() -> Handler {
    Handler::direct(|ctx, next| {
        ctx.status = 501;
        ctx.body = "Not Implemented".into();
        next.run(ctx)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    fn push(tag: &'static str) -> Handler {
        Handler::direct(move |ctx, next| {
            let body = ctx.body.as_str().unwrap_or("").to_string();
            ctx.body = format!("{body}{tag}").into();
            next.run(ctx)
        })
    }

    fn body(ctx: &Context) -> &str {
        ctx.body_text().unwrap_or("")
    }

    #[test]
    fn test_compose_runs_in_order_then_tail() {
        let chain = compose(&[push("a"), push("b"), push("c")]);
        let mut ctx = Context::new(Method::GET, "/");
        let mut tail = |ctx: &mut Context| -> HandlerResult {
            ctx.status = 200;
            Ok(())
        };
        chain.run(&mut ctx, &mut tail).unwrap();
        assert_eq!(body(&ctx), "abc");
        assert_eq!(ctx.status, 200);
    }

    #[test]
    fn test_not_calling_next_short_circuits() {
        let stop = Handler::direct(|ctx, _next| {
            ctx.status = 204;
            Ok(())
        });
        let chain = compose(&[push("a"), stop, push("never")]);
        let mut ctx = Context::new(Method::GET, "/");
        let mut reached = false;
        let mut tail = |_: &mut Context| -> HandlerResult {
            reached = true;
            Ok(())
        };
        chain.run(&mut ctx, &mut tail).unwrap();
        assert_eq!(body(&ctx), "a");
        assert_eq!(ctx.status, 204);
        assert!(!reached);
    }

    #[test]
    fn test_error_propagates() {
        let fail = Handler::direct(|_ctx, _next| Err(anyhow::anyhow!("boom")));
        let chain = compose(&[fail, push("never")]);
        let mut ctx = Context::new(Method::GET, "/");
        let err = chain.run_to_end(&mut ctx).unwrap_err();
        assert_eq!(err.to_string(), "boom");
        assert_eq!(body(&ctx), "");
    }

    #[test]
    fn test_around_wraps_downstream() {
        let wrap = Handler::around(
            |ctx| {
                ctx.body = "<".into();
                Ok(())
            },
            |ctx| {
                let body = ctx.body.as_str().unwrap_or("").to_string();
                ctx.body = format!("{body}>").into();
                Ok(())
            },
        );
        assert!(wrap.is_suspend());
        let chain = compose(&[wrap, push("x")]);
        let mut ctx = Context::new(Method::GET, "/");
        chain.run_to_end(&mut ctx).unwrap();
        assert_eq!(body(&ctx), "<x>");
    }

    #[test]
    fn test_not_implemented_stub_calls_next() {
        let chain = compose(&[not_implemented(), push("!")]);
        let mut ctx = Context::new(Method::GET, "/");
        chain.run_to_end(&mut ctx).unwrap();
        assert_eq!(ctx.status, 501);
        assert_eq!(body(&ctx), "Not Implemented!");
    }

    #[test]
    fn test_remaining_counts_downstream() {
        let probe = Handler::direct(|ctx, next| {
            ctx.status = u16::try_from(next.remaining()).unwrap_or(0);
            Ok(())
        });
        let chain = compose(&[probe, push("a"), push("b")]);
        let mut ctx = Context::new(Method::GET, "/");
        chain.run_to_end(&mut ctx).unwrap();
        assert_eq!(ctx.status, 2);
    }
}
