use crate::{db::Backend, Db, Error, Result};

use keel_core::driver::{Capability, Rows, SqlDriver};
use keel_core::stmt::Value;

use std::{
    sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError},
    thread::{self, ThreadId},
};
use tracing::{debug, warn};

/// An open transaction. Rolled back on drop unless committed.
///
/// The transaction belongs to the thread that began it. Statements issued
/// through the same `Db` from any other thread wait until it finishes, so
/// they never run inside it.
#[derive(Debug)]
#[must_use = "a transaction rolls back when dropped"]
pub struct Transaction {
    db: Db,
    driver: Arc<dyn SqlDriver>,
    done: bool,
}

/// Tracks which thread owns the open transaction, and how many statements
/// from other threads are in flight.
#[derive(Debug, Default)]
pub(crate) struct Slot {
    state: Mutex<SlotState>,
    changed: Condvar,
}

#[derive(Debug, Default)]
struct SlotState {
    owner: Option<ThreadId>,
    running: usize,
}

/// A statement in flight outside the transaction.
struct Pass<'a> {
    slot: &'a Slot,
    counted: bool,
}

impl Slot {
    fn lock(&self) -> MutexGuard<'_, SlotState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn wait<'a>(&self, state: MutexGuard<'a, SlotState>) -> MutexGuard<'a, SlotState> {
        self.changed
            .wait(state)
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Makes the current thread the owner. Fails when it already owns the
    /// transaction; waits while another thread does.
    fn claim(&self) -> Result<()> {
        let me = thread::current().id();
        let mut state = self.lock();

        if state.owner == Some(me) {
            return Err(Error::transaction_already_active());
        }

        while state.owner.is_some() || state.running > 0 {
            state = self.wait(state);
        }

        state.owner = Some(me);
        Ok(())
    }

    fn release(&self) {
        self.lock().owner = None;
        self.changed.notify_all();
    }

    /// Admits one statement. The owner passes straight through; any other
    /// thread waits for the transaction to finish.
    fn enter(&self) -> Pass<'_> {
        let me = thread::current().id();
        let mut state = self.lock();

        if state.owner == Some(me) {
            return Pass {
                slot: self,
                counted: false,
            };
        }

        while state.owner.is_some() {
            state = self.wait(state);
        }

        state.running += 1;
        Pass {
            slot: self,
            counted: true,
        }
    }

    pub(crate) fn is_claimed(&self) -> bool {
        self.lock().owner.is_some()
    }
}

impl Drop for Pass<'_> {
    fn drop(&mut self) {
        if self.counted {
            self.slot.lock().running -= 1;
            self.slot.changed.notify_all();
        }
    }
}

/// The driver as seen by a `Db`: every statement is admitted by the slot
/// first.
#[derive(Debug)]
pub(crate) struct Guarded {
    driver: Arc<dyn SqlDriver>,
    slot: Arc<Slot>,
}

impl Guarded {
    pub(crate) fn new(driver: Arc<dyn SqlDriver>, slot: Arc<Slot>) -> Guarded {
        Guarded { driver, slot }
    }
}

impl SqlDriver for Guarded {
    fn capability(&self) -> &'static Capability {
        self.driver.capability()
    }

    fn execute(&self, sql: &str) -> Result<bool> {
        let _pass = self.slot.enter();
        self.driver.execute(sql)
    }

    fn execute_update(&self, sql: &str, params: &[Value]) -> Result<u64> {
        let _pass = self.slot.enter();
        self.driver.execute_update(sql, params)
    }

    fn execute_batch(&self, sql: &str, batch: &[Vec<Value>]) -> Result<u64> {
        let _pass = self.slot.enter();
        self.driver.execute_batch(sql, batch)
    }

    fn query(&self, sql: &str, params: &[Value]) -> Result<Rows> {
        let _pass = self.slot.enter();
        self.driver.query(sql, params)
    }

    fn begin(&self) -> Result<()> {
        self.driver.begin()
    }

    fn commit(&self) -> Result<()> {
        self.driver.commit()
    }

    fn rollback(&self) -> Result<()> {
        self.driver.rollback()
    }
}

impl Db {
    /// Starts a transaction owned by the calling thread.
    ///
    /// A second `begin` on the same thread fails with
    /// `TransactionAlreadyActive` instead of nesting. On another thread it
    /// waits until the open transaction finishes.
    pub fn begin(&self) -> Result<Transaction> {
        let Backend::Sql { driver, .. } = &self.shared.backend else {
            return Err(Error::unsupported_feature(
                "transactions are not supported by document stores",
            ));
        };

        self.shared.slot.claim()?;

        if let Err(err) = driver.begin() {
            self.shared.slot.release();
            return Err(err);
        }

        debug!("transaction started");
        Ok(Transaction {
            db: self.clone(),
            driver: driver.clone(),
            done: false,
        })
    }

    /// Runs `f` inside a transaction: committed when `f` succeeds, rolled
    /// back when it fails.
    pub fn transaction<T>(&self, f: impl FnOnce(&Db) -> Result<T>) -> Result<T> {
        let tx = self.begin()?;

        match f(self) {
            Ok(value) => {
                tx.commit()?;
                Ok(value)
            }
            Err(err) => {
                tx.rollback()
                    .map_err(|rollback| rollback.context(err.clone()))?;
                Err(err)
            }
        }
    }

    /// True while a transaction is open on this handle, on any thread.
    pub fn in_transaction(&self) -> bool {
        self.shared.slot.is_claimed()
    }
}

impl Transaction {
    /// Commits. When the commit fails, a rollback is attempted before the
    /// handle accepts a new transaction, and the commit error is returned.
    pub fn commit(mut self) -> Result<()> {
        self.finish(true)
    }

    pub fn rollback(mut self) -> Result<()> {
        self.finish(false)
    }

    fn finish(&mut self, commit: bool) -> Result<()> {
        self.done = true;
        let result = if commit {
            self.driver.commit().inspect_err(|err| {
                if let Err(rollback) = self.driver.rollback() {
                    warn!(%err, %rollback, "rollback after failed commit failed");
                }
            })
        } else {
            self.driver.rollback()
        };
        self.db.shared.slot.release();

        debug!(commit, ok = result.is_ok(), "transaction finished");
        result
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        if !self.done {
            if let Err(err) = self.finish(false) {
                warn!(%err, "rollback on drop failed");
            }
        }
    }
}
