use std::sync::Arc;

use parking_lot::Mutex;

pub type ArcMutex<T> = Arc<Mutex<T>>;

pub fn arc_mutex_new<T>(object: T) -> ArcMutex<T> {
    Arc::new(Mutex::new(object))
}
