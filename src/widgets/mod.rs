//! egui widgets: everything that paints.

pub mod menu;
pub mod scatter;
pub mod scene;
pub mod transport;

pub use menu::{menu_bar, MenuResponse, MenuSelection};
pub use scatter::ScatterView;
pub use scene::SceneView;
pub use transport::{index_to_ratio, ratio_to_index, transport_bar, TransportAction};
