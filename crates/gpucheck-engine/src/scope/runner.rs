use std::future::Future;

use anyhow::Result;

use super::{ScopeOutcome, ValidationFailure};

/// A device that can bracket work in validation error scopes.
///
/// Implementors must support one active scope at a time. `Scope` is the
/// token handed out by a push and consumed by the matching pop.
pub trait ValidationScopes {
    type Scope;

    fn push_validation_scope(&self) -> Self::Scope;

    fn pop_validation_scope(&self, scope: Self::Scope) -> impl Future<Output = ScopeOutcome>;
}

impl ValidationScopes for wgpu::Device {
    type Scope = wgpu::ErrorScopeGuard;

    fn push_validation_scope(&self) -> Self::Scope {
        self.push_error_scope(wgpu::ErrorFilter::Validation)
    }

    async fn pop_validation_scope(&self, scope: Self::Scope) -> ScopeOutcome {
        ScopeOutcome::from_error(scope.pop().await)
    }
}

/// Runs `work` inside a validation error scope on `device`.
///
/// The scope is popped exactly once, after `work` has completed, on the
/// success path and on the error path alike. If `work` panics the scope
/// token is dropped while unwinding.
///
/// Errors:
/// - `work` failed: its error is returned; a validation error captured in the
///   same scope is attached as context
/// - `work` succeeded but the scope captured a validation error:
///   [`ValidationFailure`]
pub async fn run_scoped<D, F, Fut, T>(device: &D, work: F) -> Result<T>
where
    D: ValidationScopes + ?Sized,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let scope = device.push_validation_scope();
    log::trace!("validation scope pushed");

    let result = work().await;

    let outcome = device.pop_validation_scope(scope).await;
    log::trace!("validation scope popped: {outcome:?}");

    match (result, outcome) {
        (Ok(value), ScopeOutcome::NoError) => Ok(value),
        (Ok(_), ScopeOutcome::ValidationError { message }) => {
            Err(ValidationFailure { message }.into())
        }
        (Err(err), ScopeOutcome::NoError) => Err(err),
        (Err(err), ScopeOutcome::ValidationError { message }) => {
            Err(err.context(ValidationFailure { message }))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::panic::{self, AssertUnwindSafe};
    use std::rc::Rc;

    use super::*;

    /// Records scope traffic and reports a canned outcome on pop.
    ///
    /// `depth` drops when a token is released, whether by an explicit pop or
    /// by the token going out of scope.
    #[derive(Default)]
    struct FakeDevice {
        pushes: Cell<u32>,
        pops: Cell<u32>,
        depth: Rc<Cell<u32>>,
        max_depth: Cell<u32>,
        next_error: RefCell<Option<String>>,
    }

    impl FakeDevice {
        fn failing_with(message: &str) -> Self {
            let device = Self::default();
            *device.next_error.borrow_mut() = Some(message.to_string());
            device
        }
    }

    struct Token {
        id: u32,
        depth: Rc<Cell<u32>>,
    }

    impl Drop for Token {
        fn drop(&mut self) {
            self.depth.set(self.depth.get() - 1);
        }
    }

    impl ValidationScopes for FakeDevice {
        type Scope = Token;

        fn push_validation_scope(&self) -> Token {
            self.pushes.set(self.pushes.get() + 1);
            self.depth.set(self.depth.get() + 1);
            self.max_depth.set(self.max_depth.get().max(self.depth.get()));
            Token {
                id: self.pushes.get(),
                depth: Rc::clone(&self.depth),
            }
        }

        async fn pop_validation_scope(&self, scope: Token) -> ScopeOutcome {
            assert_eq!(scope.id, self.pushes.get(), "popped a stale scope");
            self.pops.set(self.pops.get() + 1);
            drop(scope);
            match self.next_error.borrow_mut().take() {
                Some(message) => ScopeOutcome::ValidationError { message },
                None => ScopeOutcome::NoError,
            }
        }
    }

    #[test]
    fn clean_work_returns_its_value() {
        let device = FakeDevice::default();
        let value = pollster::block_on(run_scoped(&device, || async { Ok(42) })).unwrap();
        assert_eq!(value, 42);
        assert_eq!((device.pushes.get(), device.pops.get()), (1, 1));
        assert_eq!(device.depth.get(), 0);
    }

    #[test]
    fn scope_is_active_while_work_runs() {
        let device = FakeDevice::default();
        pollster::block_on(run_scoped(&device, || async {
            assert_eq!(device.depth.get(), 1);
            Ok(())
        }))
        .unwrap();
        assert_eq!(device.depth.get(), 0);
    }

    #[test]
    fn failing_work_still_pops_once() {
        let device = FakeDevice::default();
        let err = pollster::block_on(run_scoped(&device, || async {
            Err::<(), _>(anyhow::anyhow!("readback mismatch"))
        }))
        .unwrap_err();

        assert_eq!(err.to_string(), "readback mismatch");
        assert_eq!((device.pushes.get(), device.pops.get()), (1, 1));
        assert_eq!(device.depth.get(), 0);
    }

    #[test]
    fn validation_error_fails_successful_work() {
        let device = FakeDevice::failing_with("Buffer usage STORAGE missing");
        let err = pollster::block_on(run_scoped(&device, || async { Ok(()) })).unwrap_err();

        let failure = err.downcast_ref::<ValidationFailure>().expect("validation failure");
        assert_eq!(failure.message, "Buffer usage STORAGE missing");
        assert_eq!(device.pops.get(), 1);
    }

    #[test]
    fn both_failures_are_surfaced() {
        let device = FakeDevice::failing_with("invalid bind group");
        let err = pollster::block_on(run_scoped(&device, || async {
            Err::<(), _>(anyhow::anyhow!("wrong result"))
        }))
        .unwrap_err();

        let failure = err.downcast_ref::<ValidationFailure>().expect("validation context");
        assert_eq!(failure.message, "invalid bind group");
        let chain: Vec<String> = err.chain().map(ToString::to_string).collect();
        assert!(chain.iter().any(|m| m == "wrong result"), "{chain:?}");
    }

    async fn panicking_work() -> Result<()> {
        panic!("work panicked mid-flight")
    }

    #[test]
    fn panicking_work_releases_the_scope() {
        let device = FakeDevice::default();

        let caught = panic::catch_unwind(AssertUnwindSafe(|| {
            pollster::block_on(run_scoped(&device, panicking_work))
        }));

        assert!(caught.is_err());
        assert_eq!(device.pushes.get(), 1);
        assert_eq!(device.pops.get(), 0);
        assert_eq!(device.depth.get(), 0);

        pollster::block_on(run_scoped(&device, || async { Ok(()) })).unwrap();
        assert_eq!(device.max_depth.get(), 1);
        assert_eq!(device.depth.get(), 0);
    }

    #[test]
    fn sequential_runs_never_nest() {
        let device = FakeDevice::default();
        for i in 0..3 {
            let _ = pollster::block_on(run_scoped(&device, || async move {
                if i == 1 {
                    anyhow::bail!("case {i} failed");
                }
                Ok(())
            }));
        }
        assert_eq!((device.pushes.get(), device.pops.get()), (3, 3));
        assert_eq!(device.max_depth.get(), 1);
    }
}
