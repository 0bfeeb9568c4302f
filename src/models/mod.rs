// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model for garment designs, the product catalog and cart hand-off.

pub mod cart;
pub mod catalog;
pub mod design;
pub mod garment;
