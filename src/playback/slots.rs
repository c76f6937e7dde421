use parking_lot::RwLock;

use crate::time_input::random_time_string;

/// Ordered list of raw time entries the sequencer walks
///
/// The sequencer only reads slots; editing is up to the UI layer.
pub trait SequenceDataSource: Send + Sync {
    fn len(&self) -> usize;

    /// Raw text at `index`, or `None` past the end
    fn raw_text(&self, index: usize) -> Option<String>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Fixed-length slot list shared between the UI and the sequencer
#[derive(Debug, Default)]
pub struct SequenceSlots {
    slots: RwLock<Vec<String>>,
}

impl SequenceSlots {
    /// `len` empty slots
    pub fn new(len: usize) -> Self {
        Self { slots: RwLock::new(vec![String::new(); len]) }
    }

    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { slots: RwLock::new(texts.into_iter().map(Into::into).collect()) }
    }

    /// Replace the text of one slot; false when `index` is out of range
    pub fn set(&self, index: usize, text: impl Into<String>) -> bool {
        match self.slots.write().get_mut(index) {
            Some(slot) => {
                *slot = text.into();
                true
            }
            None => false,
        }
    }

    /// Fill every slot with a random time
    pub fn fill_random(&self, step_minutes: u32) {
        for slot in self.slots.write().iter_mut() {
            *slot = random_time_string(step_minutes);
        }
    }

    pub fn texts(&self) -> Vec<String> {
        self.slots.read().clone()
    }
}

impl SequenceDataSource for SequenceSlots {
    fn len(&self) -> usize {
        self.slots.read().len()
    }

    fn raw_text(&self, index: usize) -> Option<String> {
        self.slots.read().get(index).cloned()
    }
}
