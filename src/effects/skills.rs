//! Skill meters.

use crate::input::Page;

/// Copies each `.circle`'s `data-percent` into its `--percent` custom property.
///
/// Returns how many meters were set.
pub fn init_skill_meters(page: &mut Page) -> usize {
    let mut count = 0;
    for circle in page.with_class("circle") {
        if let Some(percent) = page.data(circle, "percent").map(str::to_owned) {
            page.set_style(circle, "--percent", &percent);
            count += 1;
        }
    }
    count
}
