pub mod dialogs;
pub mod gantt_chart;
pub mod network_view;
pub mod theme;
pub mod toolbar;
pub mod violations_panel;
