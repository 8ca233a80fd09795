/*
 * Copyright (c) 2026 Mohamad Al-Zawahreh (dba Sovereign Systems).
 *
 * This file is part of the Ark Sovereign Compiler.
 *
 * LICENSE: DUAL-LICENSED (AGPLv3 or COMMERCIAL).
 *
 * 1. OPEN SOURCE: You may use this file under the terms of the GNU Affero
 * General Public License v3.0. If you link to this code, your ENTIRE
 * application must be open-sourced under AGPLv3.
 *
 * 2. COMMERCIAL: For proprietary use, you must obtain a Commercial License
 * from Sovereign Systems.
 *
 * PATENT NOTICE: Protected by US Patent App #63/935,467.
 * NO IMPLIED LICENSE to rights of Mohamad Al-Zawahreh or Sovereign Systems.
 */

//! Persistent, 32-way branching indexed sequences with structural sharing,
//! a transient companion for batch mutation, and a chunk-granular
//! traversal view — the vector half of Clojure-style persistent
//! collections, without the surrounding language runtime.

pub mod chunked_seq;
pub mod error;
mod node;
pub mod pvector;
pub mod reduced;
pub mod transient;

pub use chunked_seq::ChunkedSeq;
pub use error::PVecError;
pub use pvector::{Meta, PersistentVector};
pub use reduced::{Reduced, Step};
pub use transient::{Key, TransientVector};
