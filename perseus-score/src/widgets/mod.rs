//! Built-in widget types.
//!
//! Each module holds one widget's rubric and input types, its pure scoring
//! and validation functions, and the [`WidgetLogic`] that exposes them to the
//! registry.

pub mod dropdown;
pub mod free_response;
pub mod graded_group;
pub mod group;
pub mod input_number;
pub mod interactive_graph;
pub mod numeric_input;
pub mod orderer;
pub mod radio;
pub mod sorter;

use std::sync::Arc;

use crate::registry::WidgetLogic;

pub use dropdown::DropdownWidget;
pub use free_response::FreeResponseWidget;
pub use graded_group::GradedGroupWidget;
pub use group::GroupWidget;
pub use input_number::InputNumberWidget;
pub use interactive_graph::InteractiveGraphWidget;
pub use numeric_input::NumericInputWidget;
pub use orderer::OrdererWidget;
pub use radio::RadioWidget;
pub use sorter::SorterWidget;

/// Every built-in widget, in registration order.
pub fn builtin_widgets() -> Vec<Arc<dyn WidgetLogic>> {
    vec![
        Arc::new(RadioWidget),
        Arc::new(DropdownWidget),
        Arc::new(NumericInputWidget),
        Arc::new(InputNumberWidget),
        Arc::new(SorterWidget),
        Arc::new(OrdererWidget),
        Arc::new(InteractiveGraphWidget),
        Arc::new(GroupWidget),
        Arc::new(GradedGroupWidget),
        Arc::new(FreeResponseWidget),
    ]
}
