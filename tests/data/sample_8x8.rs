// Shared 8x8 RGBA fixture: even pixels (100, 150, 200, 255), odd pixels (50, 50, 50, 128).
#[allow(dead_code)]
pub const SAMPLE_8X8_RGBA: [u8; 256] = [
    100, 150, 200, 255, 50, 50, 50, 128, 100, 150, 200, 255, 50, 50, 50, 128,
    100, 150, 200, 255, 50, 50, 50, 128, 100, 150, 200, 255, 50, 50, 50, 128,
    100, 150, 200, 255, 50, 50, 50, 128, 100, 150, 200, 255, 50, 50, 50, 128,
    100, 150, 200, 255, 50, 50, 50, 128, 100, 150, 200, 255, 50, 50, 50, 128,
    100, 150, 200, 255, 50, 50, 50, 128, 100, 150, 200, 255, 50, 50, 50, 128,
    100, 150, 200, 255, 50, 50, 50, 128, 100, 150, 200, 255, 50, 50, 50, 128,
    100, 150, 200, 255, 50, 50, 50, 128, 100, 150, 200, 255, 50, 50, 50, 128,
    100, 150, 200, 255, 50, 50, 50, 128, 100, 150, 200, 255, 50, 50, 50, 128,
    100, 150, 200, 255, 50, 50, 50, 128, 100, 150, 200, 255, 50, 50, 50, 128,
    100, 150, 200, 255, 50, 50, 50, 128, 100, 150, 200, 255, 50, 50, 50, 128,
    100, 150, 200, 255, 50, 50, 50, 128, 100, 150, 200, 255, 50, 50, 50, 128,
    100, 150, 200, 255, 50, 50, 50, 128, 100, 150, 200, 255, 50, 50, 50, 128,
    100, 150, 200, 255, 50, 50, 50, 128, 100, 150, 200, 255, 50, 50, 50, 128,
    100, 150, 200, 255, 50, 50, 50, 128, 100, 150, 200, 255, 50, 50, 50, 128,
    100, 150, 200, 255, 50, 50, 50, 128, 100, 150, 200, 255, 50, 50, 50, 128,
    100, 150, 200, 255, 50, 50, 50, 128, 100, 150, 200, 255, 50, 50, 50, 128,
];
