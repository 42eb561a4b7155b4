// Reducer behavior: output length, normalization range, window partition,
// determinism, and argument checking.

use pulsebars::error::Error;
use pulsebars::spectrum::{reduce, window_range, window_ranges, SpectrumReducer};

fn assert_close(actual: &[f32], expected: &[f32]) {
    assert_eq!(actual.len(), expected.len(), "length mismatch: {:?}", actual);
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert!((a - e).abs() < 1e-4, "bar {}: expected {}, got {}", i, e, a);
    }
}

// ── Shape ────────────────────────────────────────────────────────────────────

#[test]
fn test_empty_frame_gives_zero_bars() {
    for bar_count in [1, 4, 16, 64] {
        let bars = reduce::<u8>(&[], bar_count).unwrap();
        assert_eq!(bars, vec![0.0; bar_count]);
    }
}

#[test]
fn test_output_length_always_matches_bar_count() {
    let frame: Vec<u8> = (0..=255).collect();
    for n in [0, 1, 3, 7, 8, 9, 100, 256] {
        for bar_count in [1, 2, 5, 8, 32, 300] {
            let bars = reduce(&frame[..n], bar_count).unwrap();
            assert_eq!(bars.len(), bar_count, "n={} bars={}", n, bar_count);
        }
    }
}

#[test]
fn test_values_stay_in_unit_range() {
    let frame: Vec<u8> = (0..200).map(|i| (i * 37 % 256) as u8).collect();
    for bar_count in [1, 3, 16, 64, 250] {
        for x in reduce(&frame, bar_count).unwrap() {
            assert!((0.0..=1.0).contains(&x), "out of range: {}", x);
        }
    }
}

#[test]
fn test_out_of_range_float_input_is_clamped() {
    let frame = [-10.0f32, -10.0, 300.0, 300.0, f32::NAN, f32::NAN];
    let bars = reduce(&frame, 3).unwrap();
    assert_eq!(bars, vec![0.0, 1.0, 0.0]);
}

#[test]
fn test_full_scale_input_reads_one() {
    let bars = reduce(&[255u8; 64], 8).unwrap();
    assert_eq!(bars, vec![1.0; 8]);
}

// ── Scenarios ────────────────────────────────────────────────────────────────

#[test]
fn test_eight_samples_into_four_bars() {
    let frame = [10u8, 20, 30, 40, 50, 60, 70, 80];
    let bars = reduce(&frame, 4).unwrap();
    assert_close(&bars, &[0.0588, 0.1373, 0.2157, 0.2941]);
}

#[test]
fn test_fewer_samples_than_bars_leaves_trailing_zeros() {
    let frame = [255u8, 51, 102, 153, 204];
    let bars = reduce(&frame, 8).unwrap();
    assert_close(&bars, &[1.0, 0.2, 0.4, 0.6, 0.8, 0.0, 0.0, 0.0]);
}

#[test]
fn test_bass_to_treble_order_is_preserved() {
    let frame: Vec<u8> = (0..128).map(|i| 255 - (i * 2) as u8).collect();
    let bars = reduce(&frame, 16).unwrap();
    assert!(bars.windows(2).all(|w| w[0] > w[1]), "not descending: {:?}", bars);
}

#[test]
fn test_sixteen_bit_source_with_custom_max() {
    let reducer = SpectrumReducer::new(u16::MAX as f32).unwrap();
    let frame = [u16::MAX, u16::MAX, 0, 0];
    let bars = reducer.reduce(&frame, 2).unwrap();
    assert_close(&bars, &[1.0, 0.0]);
}

#[test]
fn test_contrast_curve_applies_after_normalization() {
    let reducer = SpectrumReducer::default().with_contrast(2.0).unwrap();
    let bars = reducer.reduce(&[0.5f32 * 255.0; 4], 2).unwrap();
    assert_close(&bars, &[0.25, 0.25]);
}

// ── Windows ──────────────────────────────────────────────────────────────────

#[test]
fn test_windows_tile_the_input_exactly() {
    for n in 0..70 {
        for bar_count in 1..20 {
            let mut next = 0;
            for range in window_ranges(n, bar_count) {
                assert_eq!(range.start, next, "gap or overlap at n={} bars={}", n, bar_count);
                assert!(range.end >= range.start);
                next = range.end;
            }
            assert_eq!(next, n, "coverage incomplete for n={} bars={}", n, bar_count);
        }
    }
}

#[test]
fn test_windows_never_empty_when_enough_samples() {
    for n in 1..80 {
        for bar_count in 1..=n {
            for (i, range) in window_ranges(n, bar_count).enumerate() {
                assert!(!range.is_empty(), "window {} empty for n={} bars={}", i, n, bar_count);
            }
        }
    }
}

#[test]
fn test_window_sizes_use_ceil_width() {
    let sizes: Vec<usize> = window_ranges(10, 4).map(|r| r.len()).collect();
    assert_eq!(sizes, vec![3, 3, 3, 1]);
    assert_eq!(window_range(0, 8, 4), 0..2);
    assert_eq!(window_range(3, 8, 4), 6..8);
}

#[test]
fn test_window_sizes_rebalance_when_ceil_would_starve_a_bar() {
    // ceil(9 / 4) = 3 would give [3, 3, 3, 0]
    let sizes: Vec<usize> = window_ranges(9, 4).map(|r| r.len()).collect();
    assert_eq!(sizes, vec![3, 2, 2, 2]);

    // ceil(13 / 5) = 3 would give [3, 3, 3, 3, 1]: no starved bar, so kept
    let sizes: Vec<usize> = window_ranges(13, 5).map(|r| r.len()).collect();
    assert_eq!(sizes, vec![3, 3, 3, 3, 1]);
}

#[test]
fn test_ten_samples_into_four_bars() {
    let frame = [255u8, 255, 255, 0, 0, 0, 51, 51, 51, 102];
    let bars = reduce(&frame, 4).unwrap();
    assert_close(&bars, &[1.0, 0.0, 0.2, 0.4]);
}

// ── Determinism & errors ─────────────────────────────────────────────────────

#[test]
fn test_reduce_is_deterministic() {
    let frame: Vec<f32> = (0..513).map(|i| ((i as f32) * 0.731).sin().abs() * 255.0).collect();
    let a = reduce(&frame, 24).unwrap();
    let b = reduce(&frame, 24).unwrap();
    let a_bits: Vec<u32> = a.iter().map(|x| x.to_bits()).collect();
    let b_bits: Vec<u32> = b.iter().map(|x| x.to_bits()).collect();
    assert_eq!(a_bits, b_bits);
}

#[test]
fn test_reduce_into_matches_reduce() {
    let frame: Vec<u8> = (0..100).map(|i| (i * 3) as u8).collect();
    let mut out = [9.0f32; 12];
    SpectrumReducer::default().reduce_into(&frame, &mut out).unwrap();
    assert_eq!(out.to_vec(), reduce(&frame, 12).unwrap());
}

#[test]
fn test_zero_bars_is_invalid_argument() {
    let err = reduce(&[1u8, 2, 3], 0).unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { name: "bar_count", .. }), "{:?}", err);

    let mut out: [f32; 0] = [];
    let err = SpectrumReducer::default().reduce_into(&[1u8], &mut out).unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { .. }));
}

#[test]
fn test_bad_normalization_max_is_rejected() {
    for max in [0.0, -1.0, f32::NAN, f32::INFINITY] {
        assert!(SpectrumReducer::new(max).is_err(), "max {} accepted", max);
    }
    assert!(SpectrumReducer::default().with_contrast(0.0).is_err());
}
