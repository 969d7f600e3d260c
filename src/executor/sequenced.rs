//! Sharded executors that run tasks for the same id in order.

use std::hash::{Hash, Hasher};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::thread;

use ahash::AHasher;
use crossbeam_channel::{Receiver, Sender, bounded, unbounded};
use log::{debug, warn};

use crate::config::ExecutorConfig;
use crate::error::{DocMatchError, Result};

/// Multiplier spreading component ids over shards.
const COMPONENT_ID_PRIME: u64 = 1_099_511_628_211;

/// A unit of work.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Index of the shard a task runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExecutorId(u32);

impl ExecutorId {
    pub fn new(id: u32) -> Self {
        ExecutorId(id)
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

/// Executor that keeps tasks for the same executor id in submission order.
pub trait SequencedTaskExecutor: Send + Sync {
    fn num_executors(&self) -> u32;

    /// Map a component id to the shard that serializes its tasks.
    fn executor_id(&self, component_id: u64) -> ExecutorId {
        let shard = component_id.wrapping_mul(COMPONENT_ID_PRIME) % u64::from(self.num_executors());
        ExecutorId(shard as u32)
    }

    /// Map a component name to its shard. Stable across calls and processes.
    fn executor_id_for_name(&self, name: &str) -> ExecutorId {
        let mut hasher = AHasher::default();
        name.hash(&mut hasher);
        self.executor_id(hasher.finish())
    }

    fn execute_task(&self, id: ExecutorId, task: Task) -> Result<()>;

    /// Run `f` on the shard of `component_id`.
    fn execute<F>(&self, component_id: u64, f: F) -> Result<()>
    where
        Self: Sized,
        F: FnOnce() + Send + 'static,
    {
        self.execute_task(self.executor_id(component_id), Box::new(f))
    }

    /// Block until every task submitted before this call has finished.
    fn sync(&self) -> Result<()>;
}

fn run_task(task: Task) {
    if catch_unwind(AssertUnwindSafe(task)).is_err() {
        warn!("Sequenced task panicked");
    }
}

enum Message {
    Run(Task),
    Sync(Sender<()>),
}

/// One worker thread per shard, each draining its own channel.
pub struct ThreadedSequencedExecutor {
    senders: Vec<Sender<Message>>,
    workers: Vec<thread::JoinHandle<()>>,
}

impl ThreadedSequencedExecutor {
    pub fn new(config: ExecutorConfig) -> Result<Self> {
        config.validate()?;
        let mut senders = Vec::with_capacity(config.num_executors);
        let mut workers = Vec::with_capacity(config.num_executors);
        for shard in 0..config.num_executors {
            let (sender, receiver) = unbounded();
            let worker = thread::Builder::new()
                .name(format!("{}-{shard}", config.thread_name_prefix))
                .spawn(move || Self::worker_loop(receiver))?;
            senders.push(sender);
            workers.push(worker);
        }
        debug!("Started {} sequenced executor shards", senders.len());
        Ok(ThreadedSequencedExecutor { senders, workers })
    }

    fn worker_loop(receiver: Receiver<Message>) {
        // Exits once every sender is dropped.
        while let Ok(message) = receiver.recv() {
            match message {
                Message::Run(task) => run_task(task),
                Message::Sync(ack) => {
                    let _ = ack.send(());
                }
            }
        }
    }

    fn sender(&self, id: ExecutorId) -> Result<&Sender<Message>> {
        self.senders.get(id.get() as usize).ok_or_else(|| {
            DocMatchError::executor(format!(
                "executor id {} out of range (num executors {})",
                id.get(),
                self.senders.len()
            ))
        })
    }
}

impl SequencedTaskExecutor for ThreadedSequencedExecutor {
    fn num_executors(&self) -> u32 {
        self.senders.len() as u32
    }

    fn execute_task(&self, id: ExecutorId, task: Task) -> Result<()> {
        self.sender(id)?
            .send(Message::Run(task))
            .map_err(|_| DocMatchError::executor(format!("executor {} is shut down", id.get())))
    }

    fn sync(&self) -> Result<()> {
        let (ack_sender, ack_receiver) = bounded(self.senders.len());
        for sender in &self.senders {
            sender
                .send(Message::Sync(ack_sender.clone()))
                .map_err(|_| DocMatchError::executor("executor is shut down"))?;
        }
        drop(ack_sender);
        for _ in 0..self.senders.len() {
            ack_receiver
                .recv()
                .map_err(|_| DocMatchError::executor("executor shard stopped during sync"))?;
        }
        Ok(())
    }
}

impl Drop for ThreadedSequencedExecutor {
    fn drop(&mut self) {
        self.senders.clear();
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
        debug!("Stopped sequenced executor");
    }
}

/// Runs every task immediately on the calling thread.
#[derive(Debug, Clone)]
pub struct InlineSequencedExecutor {
    num_executors: u32,
}

impl InlineSequencedExecutor {
    pub fn new(num_executors: u32) -> Result<Self> {
        if num_executors == 0 {
            return Err(DocMatchError::invalid_config("num_executors must be > 0"));
        }
        Ok(InlineSequencedExecutor { num_executors })
    }
}

impl SequencedTaskExecutor for InlineSequencedExecutor {
    fn num_executors(&self) -> u32 {
        self.num_executors
    }

    fn execute_task(&self, id: ExecutorId, task: Task) -> Result<()> {
        if id.get() >= self.num_executors {
            return Err(DocMatchError::executor(format!(
                "executor id {} out of range (num executors {})",
                id.get(),
                self.num_executors
            )));
        }
        run_task(task);
        Ok(())
    }

    fn sync(&self) -> Result<()> {
        Ok(())
    }
}
