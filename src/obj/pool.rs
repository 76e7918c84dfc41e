// src/obj/pool.rs
//! Per-layer object arenas.
//!
//! Allocation is a bump into the layer's fixed-capacity vector. There is no
//! per-object free: releasing a layer drops every object it holds at once.

use log::{debug, warn};

use super::{NB_MAX_CONTAINER_CHILDREN, Obj, ObjHandle};
use crate::error::{NbglError, NbglResult};

/// Number of screen layers (base application screen plus modals)
pub const MAX_LAYERS: usize = 4;

/// Objects per layer
pub const OBJ_POOL_LEN: usize = 96;

type Arena = heapless::Vec<Obj, OBJ_POOL_LEN>;

pub struct ObjPool {
    layers: [Arena; MAX_LAYERS],
}

impl ObjPool {
    pub fn new() -> Self {
        Self {
            layers: core::array::from_fn(|_| heapless::Vec::new()),
        }
    }

    fn arena(&self, layer: u8) -> NbglResult<&Arena> {
        self.layers.get(layer as usize).ok_or(NbglError::InvalidHandle)
    }

    fn arena_mut(&mut self, layer: u8) -> NbglResult<&mut Arena> {
        self.layers.get_mut(layer as usize).ok_or(NbglError::InvalidHandle)
    }

    /// Check an object into `layer`
    pub fn alloc(&mut self, layer: u8, obj: Obj) -> NbglResult<ObjHandle> {
        let arena = self.arena_mut(layer)?;
        let index = arena.len() as u16;
        arena.push(obj).map_err(|_| {
            warn!("Object pool of layer {} exhausted", layer);
            NbglError::ObjectPoolExhausted {
                layer,
                max: OBJ_POOL_LEN,
            }
        })?;
        Ok(ObjHandle { layer, index })
    }

    pub fn get(&self, handle: ObjHandle) -> NbglResult<&Obj> {
        self.arena(handle.layer)?
            .get(handle.index as usize)
            .ok_or(NbglError::InvalidHandle)
    }

    pub fn get_mut(&mut self, handle: ObjHandle) -> NbglResult<&mut Obj> {
        self.arena_mut(handle.layer)?
            .get_mut(handle.index as usize)
            .ok_or(NbglError::InvalidHandle)
    }

    /// Append `child` to the children of `parent`
    pub fn add_child(&mut self, parent: ObjHandle, child: ObjHandle) -> NbglResult<()> {
        self.get(child)?;
        let container = self.get_mut(parent)?.container_mut()?;
        container.children.push(child).map_err(|_| {
            warn!("Container full, cannot add child");
            NbglError::ContainerFull {
                max: NB_MAX_CONTAINER_CHILDREN,
            }
        })
    }

    /// Allocate `obj` and append it to `parent`
    pub fn alloc_child(&mut self, parent: ObjHandle, obj: Obj) -> NbglResult<ObjHandle> {
        let handle = self.alloc(parent.layer, obj)?;
        self.add_child(parent, handle)?;
        Ok(handle)
    }

    /// Return every object of `layer` to the pool
    pub fn release(&mut self, layer: u8) {
        if let Ok(arena) = self.arena_mut(layer) {
            debug!("Releasing {} objects of layer {}", arena.len(), layer);
            arena.clear();
        }
    }

    pub fn len(&self, layer: u8) -> usize {
        self.arena(layer).map(|a| a.len()).unwrap_or(0)
    }

    pub fn is_empty(&self, layer: u8) -> bool {
        self.len(layer) == 0
    }

    /// Whether `handle` belongs to the tree rooted at `root`
    pub fn contains(&self, root: ObjHandle, handle: ObjHandle) -> bool {
        if root == handle {
            return true;
        }
        match self.get(root).ok().and_then(|obj| obj.children()) {
            Some(children) => children.iter().any(|&child| self.contains(child, handle)),
            None => false,
        }
    }
}

impl Default for ObjPool {
    fn default() -> Self {
        Self::new()
    }
}
