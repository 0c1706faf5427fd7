mod check;
mod dashboard;
mod format;
mod report;

pub(crate) use check::render_checks;
pub(crate) use dashboard::{render_batch_detail, render_dashboard, render_overview};
pub(crate) use report::render_text_report;
