//! Shared test helpers for ledger tests.

#![allow(dead_code)]

use keyforge_ledger::{CodeGenerator, KeyRequest, Ledger, RandomCodes, Scope};
use keyforge_types::{KeyClass, KeyDuration};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Generator replaying a fixed list of codes, then repeating the last one.
pub struct ScriptedCodes {
    queue: Mutex<VecDeque<String>>,
    last: Mutex<String>,
}

impl ScriptedCodes {
    pub fn new(codes: &[&str]) -> Self {
        Self {
            queue: Mutex::new(codes.iter().map(|c| c.to_string()).collect()),
            last: Mutex::new(codes.last().copied().unwrap_or("CODE").to_string()),
        }
    }
}

impl CodeGenerator for ScriptedCodes {
    fn generate(&self, _scope: Scope, _class: KeyClass, _duration: KeyDuration) -> String {
        self.queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.last.lock().unwrap().clone())
    }
}

pub fn request(class: KeyClass, duration: KeyDuration) -> KeyRequest {
    KeyRequest {
        class,
        duration,
        device_slots: 1,
    }
}

pub fn vip_day() -> KeyRequest {
    request(KeyClass::Vip, KeyDuration::OneDay)
}

pub fn free_day() -> KeyRequest {
    request(KeyClass::Free, KeyDuration::OneDay)
}

pub fn ledger(shared_balance: u64) -> Ledger {
    Ledger::new(shared_balance, Arc::new(RandomCodes::default()))
}
