//! Item registry shared by both schedulers.

use crate::config::Config;
use crate::descriptor::{default_timing, parse_units_json, UnitDesc};
use crate::easing::EasingTable;
use crate::error::{MotionError, Result};
use crate::ids::{IdAllocator, ItemId};
use crate::item::Item;
use crate::outputs::{ItemEvent, ItemEventKind, Outputs};

/// Items in registration order plus the defaults used to build their units.
#[derive(Debug)]
pub struct Stage {
    cfg: Config,
    easings: EasingTable,
    ids: IdAllocator,
    items: Vec<Item>,
}

impl Stage {
    pub fn new(cfg: Config, easings: EasingTable) -> Self {
        Self {
            cfg,
            easings,
            ids: IdAllocator::new(),
            items: Vec::new(),
        }
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    #[inline]
    pub fn easings(&self) -> &EasingTable {
        &self.easings
    }

    #[inline]
    pub fn easings_mut(&mut self) -> &mut EasingTable {
        &mut self.easings
    }

    pub fn add_item(&mut self) -> ItemId {
        let id = self.ids.alloc_item();
        self.items.push(Item::new(id));
        id
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|i| i.id() == id)
    }

    pub fn item_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.items.iter_mut().find(|i| i.id() == id)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut [Item] {
        &mut self.items
    }

    /// Build `desc` with the configured defaults and queue it on `id`.
    pub fn animate(&mut self, id: ItemId, desc: &UnitDesc) -> Result<()> {
        let defaults = default_timing(&self.cfg, &self.easings);
        let unit = desc.build(&defaults, &self.easings)?;
        self.item_mut(id)
            .ok_or(MotionError::UnknownItem(id))?
            .push(unit);
        Ok(())
    }

    /// Queue every unit of a JSON descriptor (object or array). Nothing is
    /// queued unless every unit builds. Returns how many were queued.
    pub fn animate_json(&mut self, id: ItemId, json: &str) -> Result<usize> {
        let defaults = default_timing(&self.cfg, &self.easings);
        let units = parse_units_json(json)?
            .iter()
            .map(|d| d.build(&defaults, &self.easings))
            .collect::<Result<Vec<_>>>()?;
        let item = self.item_mut(id).ok_or(MotionError::UnknownItem(id))?;
        let count = units.len();
        for unit in units {
            item.push(unit);
        }
        Ok(count)
    }

    /// Collect journals and current frames of every item, in registration order.
    pub(crate) fn collect(&mut self, outputs: &mut Outputs) {
        for item in self.items.iter_mut() {
            for event in item.drain_events() {
                outputs.push_event(ItemEvent {
                    item: item.id(),
                    kind: ItemEventKind::Motion(event),
                });
            }
            outputs.push_frame(item.frame());
        }
    }
}

pub(crate) fn error_event(item: ItemId, err: &MotionError) -> ItemEvent {
    log::warn!("item {item:?} update failed ({}): {err}", err.category());
    ItemEvent {
        item,
        kind: ItemEventKind::Error {
            message: err.to_string(),
        },
    }
}
