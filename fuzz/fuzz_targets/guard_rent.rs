#![no_main]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use libfuzzer_sys::fuzz_target;
use rentbuf::RentGuard;

// Drive random rent/release orders and require the teardown callback to
// fire exactly once, only after the last handle is gone.
fuzz_target!(|data: Vec<u8>| {
    let teardowns = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&teardowns);
    let guard = RentGuard::with_teardown((), move |()| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let mut handles = Vec::new();
    let mut ever_rented = false;

    for op in data {
        if guard.is_dropped() {
            // Terminal state: renting must fail forever.
            assert!(guard.rent().is_err());
            continue;
        }
        match op % 3 {
            0 => {
                let handle = guard.rent().unwrap();
                handles.push(handle);
                ever_rented = true;
            }
            1 => {
                if !handles.is_empty() {
                    let index = op as usize % handles.len();
                    handles[index].release();
                    // Releasing again is always a no-op.
                    handles[index].release();
                }
            }
            _ => {
                if !handles.is_empty() {
                    let index = op as usize % handles.len();
                    handles.swap_remove(index);
                }
            }
        }

        assert!(teardowns.load(Ordering::SeqCst) <= 1);
        let armed = handles.iter().filter(|h| h.is_armed()).count();
        assert_eq!(guard.references(), armed);
    }

    drop(handles);
    if ever_rented {
        assert_eq!(teardowns.load(Ordering::SeqCst), 1);
        assert!(guard.is_dropped());
        assert!(guard.rent().is_err());
    }

    drop(guard);
    assert_eq!(teardowns.load(Ordering::SeqCst), 1);
});
