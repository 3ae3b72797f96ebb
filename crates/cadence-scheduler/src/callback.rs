// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Callback and context types registered with the scheduler.
//!
//! A registration is keyed by the *identity* of its callback and context: two
//! clones of the same [`TickCallback`] are the same callback, while two
//! separately constructed closures never are, even if their code is identical.

use anyhow::anyhow;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

/// The signature of a scheduled function: it receives the elapsed time since
/// its task's previous fire.
type TickFn = dyn FnMut(Duration) -> anyhow::Result<()>;

/// A shared, clonable handle to a scheduled function.
///
/// Returning an `Err` (or panicking) does not disturb the rest of the tick:
/// the scheduler catches the failure and reports it as a
/// [`SchedulerEvent`](crate::SchedulerEvent).
#[derive(Clone)]
pub struct TickCallback(Rc<RefCell<TickFn>>);

impl TickCallback {
    /// Wraps a fallible closure.
    pub fn new<F>(f: F) -> Self
    where
        F: FnMut(Duration) -> anyhow::Result<()> + 'static,
    {
        Self(Rc::new(RefCell::new(f)))
    }

    /// Wraps a closure that cannot fail.
    pub fn infallible<F>(mut f: F) -> Self
    where
        F: FnMut(Duration) + 'static,
    {
        Self::new(move |delta| {
            f(delta);
            Ok(())
        })
    }

    /// Returns `true` if both handles point to the same function.
    pub fn same_as(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Invokes the function.
    ///
    /// A callback that is already on the stack (it re-entered a dispatch that
    /// reached it again) reports an error instead of aliasing its state.
    pub(crate) fn invoke(&self, delta: Duration) -> anyhow::Result<()> {
        let mut f = self
            .0
            .try_borrow_mut()
            .map_err(|_| anyhow!("callback invoked while it is already running"))?;
        (*f)(delta)
    }
}

impl fmt::Debug for TickCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TickCallback")
            .field(&Rc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}

/// Identifies a logical group of registrations (for example, every callback
/// owned by one scene) that can be paused and resumed together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupKey(pub u64);

impl From<u64> for GroupKey {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "group#{}", self.0)
    }
}

/// The context object a callback is registered with.
///
/// The scheduler never inspects a context beyond its identity and the optional
/// group lookup used by [`Scheduler::set_group_active`](crate::Scheduler::set_group_active).
pub trait TickContext {
    /// Returns the group this context belongs to, if any.
    fn group(&self) -> Option<GroupKey> {
        None
    }
}

impl TickContext for () {}

/// A ready-made context that belongs to a single group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupMember(pub GroupKey);

impl TickContext for GroupMember {
    fn group(&self) -> Option<GroupKey> {
        Some(self.0)
    }
}

/// A type-erased, shared context.
#[derive(Clone)]
pub(crate) struct ContextRef(Rc<dyn TickContext>);

impl ContextRef {
    pub(crate) fn new<C: TickContext + 'static>(context: &Rc<C>) -> Self {
        let erased: Rc<dyn TickContext> = context.clone();
        Self(erased)
    }

    /// Compares data pointers only; the vtable is irrelevant to identity.
    pub(crate) fn same_as(&self, other: &Self) -> bool {
        std::ptr::eq(
            Rc::as_ptr(&self.0).cast::<()>(),
            Rc::as_ptr(&other.0).cast::<()>(),
        )
    }

    pub(crate) fn group(&self) -> Option<GroupKey> {
        self.0.group()
    }
}

impl fmt::Debug for ContextRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ContextRef")
            .field(&Rc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}
