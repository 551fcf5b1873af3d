/// Helper macro for locking items
///
/// ```rust, ignore
///  let mut data = lock!(my_mutex);
///  data.some_field = 42;
/// ```
macro_rules! lock {
    ($lock:expr) => {
        $lock.lock().expect("Failed to acquire lock")
    };
}

/// Helper macro for blocking on a condition variable with a held guard
///
/// ```rust, ignore
///  let mut data = lock!(my_mutex);
///  while data.busy {
///      data = wait!(my_condvar, data);
///  }
/// ```
macro_rules! wait {
    ($condvar:expr, $guard:expr) => {
        $condvar.wait($guard).expect("Failed to wait on condition")
    };
}
