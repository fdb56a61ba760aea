//! Display seam between the board and whatever shows it.

use crate::{notice::Toast, render::BoardView};

pub trait DisplaySurface: Send {
    fn render(&mut self, view: &BoardView);
    fn notify(&mut self, toast: Toast);

    /// Called periodically so surfaces can dismiss expired toasts.
    fn tick(&mut self) {}
}

/// Fans every call out to several surfaces, e.g. a terminal and an HTML file.
impl DisplaySurface for Vec<Box<dyn DisplaySurface>> {
    fn render(&mut self, view: &BoardView) {
        for surface in self.iter_mut() {
            surface.render(view);
        }
    }

    fn notify(&mut self, toast: Toast) {
        for surface in self.iter_mut() {
            surface.notify(toast.clone());
        }
    }

    fn tick(&mut self) {
        for surface in self.iter_mut() {
            surface.tick();
        }
    }
}
