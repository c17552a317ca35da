//! Change notification capability.
//!
//! The registry publishes through this after every committed mutation and
//! refresh; presentation code subscribes to re-render. The core never calls
//! rendering code directly.

type Handler = Box<dyn Fn() + Send>;

/// Publish/subscribe over boxed handlers. Handlers run synchronously on the
/// publishing thread, in subscription order.
#[derive(Default)]
pub struct ChangeNotifier {
    handlers: Vec<Handler>,
}

impl ChangeNotifier {
    pub fn subscribe(&mut self, handler: impl Fn() + Send + 'static) {
        self.handlers.push(Box::new(handler));
    }

    pub fn publish(&self) {
        for handler in &self.handlers {
            handler();
        }
    }
}
