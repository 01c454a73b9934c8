use approx::assert_abs_diff_eq;
use poisson_rust::fields::{constant, cubic, cubic_laplacian, only_borders};
use poisson_rust::{
    solve_parallel, solve_parallel_barrier, solve_sequential, Net, NetError, SolveError, Wavefront,
};

const EPS: f64 = 1e-9;

fn zero(_: f64, _: f64) -> f64 {
    0.0
}

fn linear_x(x: f64, _: f64) -> f64 {
    x
}

/// Border nodes of `net`, row-major.
fn border(net: &Net) -> Vec<f64> {
    let size = net.size();
    (0..size)
        .flat_map(|i| (0..size).map(move |j| (i, j)))
        .filter(|&(i, j)| net.is_border(i, j))
        .map(|(i, j)| net.u(i, j))
        .collect()
}

fn assert_linear_interior(net: &Net, tolerance: f64) {
    let size = net.size();
    for i in 1..size - 1 {
        for j in 1..size - 1 {
            assert_abs_diff_eq!(net.u(i, j), i as f64 * net.h(), epsilon = tolerance);
        }
    }
}

#[test]
fn test_linear_field_is_exact_in_one_pass() {
    let mut net = Net::new(5, linear_x, zero).unwrap();
    assert_eq!(solve_sequential(&mut net, EPS).unwrap(), 1);
    assert_linear_interior(&net, 0.0);

    let mut net = Net::new(5, linear_x, zero).unwrap();
    assert_eq!(solve_parallel(&mut net, 2, EPS).unwrap(), 1);
    assert_linear_interior(&net, 0.0);
}

#[test]
fn test_linear_field_from_zero_seed() {
    let mut sequential = Net::new(5, only_borders(linear_x), zero).unwrap();
    let iterations = solve_sequential(&mut sequential, EPS).unwrap();
    assert!(iterations > 1 && iterations < 100, "took {iterations} passes");
    assert_linear_interior(&sequential, 1e-7);

    for block_size in [1, 2, 3] {
        let mut wavefront = Net::new(5, only_borders(linear_x), zero).unwrap();
        let iterations = solve_parallel(&mut wavefront, block_size, EPS).unwrap();
        assert!(iterations > 1 && iterations < 100, "took {iterations} passes");
        assert_linear_interior(&wavefront, 1e-7);
    }

    let mut barrier = Net::new(5, only_borders(linear_x), zero).unwrap();
    solve_parallel_barrier(&mut barrier, 2, 2, EPS).unwrap();
    assert_linear_interior(&barrier, 1e-7);
}

#[test]
fn test_constant_boundary_gives_constant_interior() {
    let c = 3.5;
    let mut sequential = Net::new(9, only_borders(constant(c)), zero).unwrap();
    solve_sequential(&mut sequential, EPS).unwrap();

    let mut wavefront = Net::new(9, only_borders(constant(c)), zero).unwrap();
    solve_parallel(&mut wavefront, 3, EPS).unwrap();

    for net in [&sequential, &wavefront] {
        for i in 1..8 {
            for j in 1..8 {
                assert_abs_diff_eq!(net.u(i, j), c, epsilon = 1e-6);
            }
        }
    }
}

#[test]
fn test_boundary_conditions() {
    let fresh = Net::new(12, only_borders(cubic), cubic_laplacian).unwrap();
    let expected = border(&fresh);

    let mut sequential = fresh.clone();
    solve_sequential(&mut sequential, 1e-6).unwrap();
    assert_eq!(border(&sequential), expected, "sequential solver wrote the border");

    let mut wavefront = fresh.clone();
    solve_parallel(&mut wavefront, 4, 1e-6).unwrap();
    assert_eq!(border(&wavefront), expected, "wavefront solver wrote the border");

    let mut barrier = fresh.clone();
    solve_parallel_barrier(&mut barrier, 3, 3, 1e-6).unwrap();
    assert_eq!(border(&barrier), expected, "barrier solver wrote the border");

    // source term and coordinates are never touched either
    assert_eq!(wavefront.f_values(), fresh.f_values());
    assert_eq!(wavefront.points(), fresh.points());
}

#[test]
fn test_clipped_last_block() {
    // interior of 10 does not divide into blocks of 4
    let mut net = Net::new(12, linear_x, zero).unwrap();
    let before = border(&net);
    assert_eq!(solve_parallel(&mut net, 4, EPS).unwrap(), 1);
    assert_eq!(border(&net), before);
    assert_linear_interior(&net, 1e-12);
}

#[test]
fn test_huge_block_size_is_one_block() {
    let mut sequential = Net::new(5, only_borders(cubic), cubic_laplacian).unwrap();
    let sequential_iterations = solve_sequential(&mut sequential, EPS).unwrap();

    let mut wavefront = Net::new(5, only_borders(cubic), cubic_laplacian).unwrap();
    let wavefront_iterations = solve_parallel(&mut wavefront, usize::MAX, EPS).unwrap();
    assert_eq!(wavefront_iterations, sequential_iterations);
    assert_eq!(wavefront.u_values(), sequential.u_values());

    let mut barrier = Net::new(5, only_borders(cubic), cubic_laplacian).unwrap();
    solve_parallel_barrier(&mut barrier, 2, usize::MAX, EPS).unwrap();
    assert_eq!(barrier.u_values(), sequential.u_values());
}

#[test]
fn test_precondition_violations() {
    assert!(matches!(
        Net::new(2, zero, zero),
        Err(NetError::TooSmall { size: 2 })
    ));

    let mut net = Net::new(6, only_borders(cubic), cubic_laplacian).unwrap();
    let before = net.u_values().to_vec();
    assert!(matches!(
        solve_sequential(&mut net, -1.0),
        Err(SolveError::Tolerance { .. })
    ));
    assert!(matches!(
        solve_parallel(&mut net, 0, EPS),
        Err(SolveError::BlockSize)
    ));
    assert!(matches!(
        solve_parallel(&mut net, 2, f64::NAN),
        Err(SolveError::Tolerance { .. })
    ));
    assert!(matches!(
        solve_parallel_barrier(&mut net, 0, 2, EPS),
        Err(SolveError::Threads)
    ));
    assert_eq!(net.u_values(), before.as_slice());
}

#[test]
fn test_allocation_failure_on_construction() {
    let calls = std::cell::Cell::new(0);
    let counting = |_: f64, _: f64| {
        calls.set(calls.get() + 1);
        0.0
    };

    // size * size elements overflow the byte budget of a Vec
    let err = Net::new(1 << 31, counting, counting).unwrap_err();
    assert!(matches!(err, NetError::Allocation(_)), "{err}");
    assert!(err.is_allocation());

    // size * size itself overflows
    let err = Net::new(usize::MAX, counting, counting).unwrap_err();
    assert!(matches!(err, NetError::TooLarge { .. }), "{err}");
    assert!(err.is_allocation());

    // nothing was evaluated before storage was secured
    assert_eq!(calls.get(), 0);
}

#[test]
fn test_allocation_failure_on_delta_slots() {
    // solve_parallel reserves these slots before its first sweep, so this
    // error reaches the caller with the net unmodified. A real net is always
    // larger than its slot array, hence the oversized plan.
    let plan = Wavefront::new(usize::MAX, 1).unwrap();
    let err = plan.delta_slots().unwrap_err();
    assert!(matches!(err, SolveError::Allocation(_)));
    assert!(err.to_string().contains("convergence slots"));
}
