//! The static menu a customer orders from.

use crate::core::types::SimTime;
use serde::Serialize;

/// A dish and the fixed time the kitchen needs to prepare it
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MenuItem {
    pub name: &'static str,
    pub preparation_time: SimTime,
}

pub const KIMCHI_FRIED_RICE: MenuItem = MenuItem {
    name: "Kimchi-Fried-Rice",
    preparation_time: 5.0,
};

pub const SPICY_RICE_CAKES: MenuItem = MenuItem {
    name: "Spicy-Rice-Cakes",
    preparation_time: 3.0,
};

/// Catalog in draw order; uniform choices index into it
pub const MENU: [MenuItem; 2] = [KIMCHI_FRIED_RICE, SPICY_RICE_CAKES];
