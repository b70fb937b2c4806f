use stag_effects::filters::{Kernel, MAX_STACK_RADIUS, SHARPEN_SIGMA_CEILING};
use stag_effects::{gaussian_blur, sharpen, stack_blur, Chain, EffectError, PixelBuffer};

fn gradient(w: usize, h: usize) -> PixelBuffer {
    let mut buf = PixelBuffer::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let v = ((x * 255) / w.max(1)) as u8;
            buf.set_pixel(x, y, [v, 255 - v, ((y * 40) % 256) as u8, 128 + (x % 2) as u8 * 127]);
        }
    }
    buf
}

fn bright_center(r: usize) -> PixelBuffer {
    let size = 2 * r + 1;
    let mut buf = PixelBuffer::new(size, size);
    buf.set_pixel(r, r, [0x66, 0xaa, 0xff, 0xff]);
    buf
}

#[test]
fn identity_at_zero() {
    let src = gradient(11, 7).with_origin(-4, 9);
    for out in [
        gaussian_blur(&src, 0.0),
        sharpen(&src, 0.0),
        stack_blur(&src, 0).unwrap(),
    ] {
        assert!(out.same_pixels(&src));
        assert_eq!(out.origin(), (0, 0));
    }
}

#[test]
fn kernels_are_normalized() {
    for sigma in [0.2, 0.5, 1.0, 3.3, 12.0] {
        let sum: f64 = Kernel::gaussian(sigma).weights().iter().sum();
        approx::assert_relative_eq!(sum, 1.0, epsilon = 1e-12);
    }
}

#[test]
fn bright_pixel_stays_put_at_zero_sigma() {
    for r in [1, 2, 4] {
        let src = bright_center(r);
        let out = gaussian_blur(&src, 0.0);
        assert_eq!(out, src);
    }
}

#[test]
fn stack_blur_does_not_leak_past_support() {
    let size = 9;
    let mut src = PixelBuffer::new(size, size);
    src.set_pixel(4, 4, [255, 255, 255, 255]);
    let out = stack_blur(&src, 2).unwrap();
    for y in 0..size {
        for x in 0..size {
            let inside = x.abs_diff(4) <= 2 && y.abs_diff(4) <= 2;
            if !inside {
                assert_eq!(out.pixel(x, y), [0, 0, 0, 0], "({}, {})", x, y);
            }
        }
    }
}

#[test]
fn literal_three_by_three_example() {
    let src = bright_center(1).with_origin(-1, -1);
    let out = gaussian_blur(&src, 0.5);
    let expected_alpha = [[0x04, 0x18, 0x04], [0x18, 0x9e, 0x18], [0x04, 0x18, 0x04]];
    for y in 0..3 {
        for x in 0..3 {
            let px = out.pixel(x, y);
            assert_eq!(px[3], expected_alpha[y][x]);
            assert_eq!(&px[..3], &[0x66, 0xaa, 0xff]);
        }
    }
}

#[test]
fn sharpen_clamps_extremes() {
    let mut src = PixelBuffer::new(8, 8);
    for y in 0..8 {
        for x in 0..8 {
            let v = if x < 4 { 0 } else { 255 };
            src.set_pixel(x, y, [v, v, 255 - v, v]);
        }
    }
    for sigma in [0.5, 2.0, SHARPEN_SIGMA_CEILING, 500.0] {
        let out = sharpen(&src, sigma);
        // Both sides already sit at a limit, so clamping returns them unchanged
        assert!(out.same_pixels(&src));
    }
}

#[test]
fn radius_validity() {
    let src = gradient(6, 6);
    assert!(stack_blur(&src, 0).is_ok());
    assert!(stack_blur(&src, 1).is_ok());
    assert!(stack_blur(&src, 1000).is_ok());
    assert!(matches!(stack_blur(&src, -1), Err(EffectError::InvalidRadius(-1))));
    assert!(matches!(
        stack_blur(&src, MAX_STACK_RADIUS as i64 + 1),
        Err(EffectError::InvalidRadius(_))
    ));
}

#[test]
fn filters_preserve_dimensions() {
    let src = gradient(13, 5);
    assert_eq!(gaussian_blur(&src, 2.2).view().dim(), (5, 13, 4));
    assert_eq!(stack_blur(&src, 3).unwrap().view().dim(), (5, 13, 4));
    assert_eq!(sharpen(&src, 1.1).view().dim(), (5, 13, 4));
}

#[test]
fn concurrent_calls_agree() {
    let src = gradient(32, 24);
    let expected = gaussian_blur(&src, 1.8);
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let src = src.clone();
            std::thread::spawn(move || gaussian_blur(&src, 1.8))
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn chain_reports_only_first_failure() {
    let result = Chain::new(gradient(4, 4))
        .sharpen(1.0)
        .stack_blur(-7)
        .gaussian_blur(1.0)
        .stack_blur(-8)
        .into_result();
    assert!(matches!(result, Err(EffectError::InvalidRadius(-7))));
}
