//! Example demonstrating each callable wrapper in a small event-handling scenario.

use std::cell::Cell;
use std::rc::Rc;

use callback_contracts::{
    CallOnceSilent, CallOnceStrict, CallbackGuard, Error, LocalExpiryAction, NotEmptyFn, SharedFn,
};

struct Connection {
    guard: CallbackGuard,
    received: Rc<Cell<usize>>,
}

impl Connection {
    fn on_data(&self) -> impl Fn(usize) + use<> {
        let received = Rc::clone(&self.received);
        let callback = self.guard.make_guarded_callback_with_fallback(
            move |len: usize| received.set(received.get() + len),
            || println!("Connection is gone, dropping data."),
        );

        move |len| {
            callback.call((len,));
        }
    }
}

fn main() {
    println!("=== NotEmptyFn ===");
    let format = NotEmptyFn::new(|name: &str| format!("hello, {name}"));
    println!("{}", format.call(("world",)));

    println!("\n=== SharedFn ===");
    let mut calls = 0;
    let tally = SharedFn::new(move || {
        calls += 1;
        calls
    });
    let tally_clone = tally.clone();
    tally.call(()).unwrap();
    println!("Calls seen through the clone: {:?}", tally_clone.call(()));

    println!("\n=== CallOnceSilent / CallOnceStrict ===");
    let mut greet = CallOnceSilent::new(|| println!("Greeting once."));
    greet.call(());
    greet.call(());

    let mut commit = CallOnceStrict::new(|| println!("Committing."));
    commit.call(()).unwrap();
    assert_eq!(commit.call(()), Err(Error::EmptyTarget));
    println!("Second commit rejected.");

    println!("\n=== LocalExpiryAction ===");
    let cleanup = LocalExpiryAction::new(|| println!("Last handle gone, cleaning up."));
    let cleanup_clone = cleanup.clone();
    drop(cleanup);
    println!("One handle dropped, cleanup still pending.");
    drop(cleanup_clone);

    println!("\n=== CallbackGuard ===");
    let connection = Connection {
        guard: CallbackGuard::new(),
        received: Rc::new(Cell::new(0)),
    };
    let on_data = connection.on_data();
    on_data(128);
    println!("Received {} bytes.", connection.received.get());
    drop(connection);
    on_data(64);
}
