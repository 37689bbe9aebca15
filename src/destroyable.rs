// implemented by owners of scheduled work or subscriptions that must be released explicitly
pub trait Destroyable {
    fn destroy(&mut self);
}
