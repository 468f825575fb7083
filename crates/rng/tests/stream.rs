use rng::StreamRng;

#[test]
fn same_seed_replays_sequence() {
    let mut a = StreamRng::new(b"replay");
    let mut b = StreamRng::new(b"replay");

    for _ in 0..64 {
        assert_eq!(a.next_u64(b"X"), b.next_u64(b"X"));
    }
    assert_eq!(a.draws(), 64);
}

#[test]
fn forks_are_independent() {
    let mut a = StreamRng::fork("seed", "trial", 0);
    let mut b = StreamRng::fork("seed", "trial", 1);

    let xa: Vec<u64> = (0..8).map(|_| a.next_u64(b"X")).collect();
    let xb: Vec<u64> = (0..8).map(|_| b.next_u64(b"X")).collect();
    assert_ne!(xa, xb);
}

#[test]
fn context_changes_output() {
    let mut a = StreamRng::new(b"ctx");
    let mut b = StreamRng::new(b"ctx");
    assert_ne!(a.next_u64(b"FLIP"), b.next_u64(b"ORDER"));
}

#[test]
fn unit_interval_and_index_bounds() {
    let mut rng = StreamRng::new(b"bounds");
    for _ in 0..500 {
        let u = rng.next_f64(b"U");
        assert!((0.0..1.0).contains(&u), "u = {}", u);

        let k = rng.next_below(7, b"K");
        assert!(k < 7);

        let s = rng.next_spin(b"S");
        assert!(s == 1 || s == -1);
    }
}

#[test]
fn uniform_mean_is_centered() {
    let mut rng = StreamRng::new(b"mean");
    let n = 4000;
    let mean: f64 = (0..n).map(|_| rng.next_f64(b"U")).sum::<f64>() / n as f64;
    assert!((mean - 0.5).abs() < 0.03, "mean = {}", mean);
}

#[test]
fn shuffle_is_a_permutation() {
    let mut rng = StreamRng::new(b"shuffle");
    let mut items: Vec<usize> = (0..20).collect();
    rng.shuffle(&mut items, b"ORDER");

    let mut sorted = items.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, (0..20).collect::<Vec<_>>());
}
