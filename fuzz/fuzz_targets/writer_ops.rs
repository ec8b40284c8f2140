#![no_main]

use std::sync::Arc;

use libfuzzer_sys::fuzz_target;
use rentbuf::{BucketPool, GrowableWriter};

// Drive a random op sequence against a Vec<u8> model and require the
// writer's written region to match the model at every step.
fuzz_target!(|data: Vec<u8>| {
    // Exercise several baselines so grow boundaries land in different
    // places for the same op sequence.
    for baseline in [1usize, 2, 7, 64] {
        let pool: Arc<BucketPool<u8>> = Arc::new(BucketPool::new());
        let mut writer = GrowableWriter::with_baseline(Arc::clone(&pool) as _, baseline).unwrap();
        let mut model: Vec<u8> = Vec::new();
        let mut total_appended: usize = 0;

        let mut bytes = data.iter().copied();
        while let Some(op) = bytes.next() {
            match op % 4 {
                0 => {
                    let value = bytes.next().unwrap_or(0);
                    writer.append(value).unwrap();
                    model.push(value);
                    total_appended += 1;
                }
                1 => {
                    let len = bytes.next().unwrap_or(0) as usize;
                    let slice: Vec<u8> = (&mut bytes).take(len).collect();
                    writer.extend_from_slice(&slice).unwrap();
                    model.extend_from_slice(&slice);
                    total_appended += slice.len();
                }
                2 => {
                    writer.clear();
                    model.clear();
                    // Clear reverts to baseline capacity, never larger
                    // than the rounded-up baseline block.
                    assert!(writer.capacity() <= baseline.next_power_of_two());
                }
                _ => {
                    let hint = bytes.next().unwrap_or(0) as usize;
                    let region = writer.writable_region(hint).unwrap();
                    assert!(hint == 0 || region.len() >= hint);
                    // Regions are handed out but not advanced, so the
                    // written region is unchanged.
                }
            }

            assert_eq!(writer.written_region(), model.as_slice());
            assert_eq!(writer.written(), model.len());
        }

        assert!(writer.written() <= total_appended);
        assert!(writer.capacity() >= writer.written());
    }
});
