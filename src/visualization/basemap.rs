//! Procedural equirectangular basemap
//!
//! Coarse coastline polygons rasterized into an RGBA texture with a 30°
//! graticule. Pixel (x, y) covers lon -180..180 left to right and lat 90..-90
//! top to bottom, matching the globe mesh UVs.

use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};

const OCEAN: [u8; 3] = [18, 52, 92];
const LAND: [u8; 3] = [78, 118, 62];
const ICE: [u8; 3] = [214, 224, 232];
const GRATICULE_STEP_DEG: f32 = 30.0;

/// Outlines as (lon, lat) rings. None of them cross the antimeridian.
const LANDMASSES: &[&[(f32, f32)]] = &[
    NORTH_AMERICA,
    SOUTH_AMERICA,
    EURASIA,
    AFRICA,
    AUSTRALIA,
    ANTARCTICA,
    GREENLAND,
    BAFFIN,
    ELLESMERE,
    VICTORIA_ISLAND,
    GREAT_BRITAIN,
    IRELAND,
    ICELAND,
    JAPAN,
    SAKHALIN,
    TAIWAN,
    LUZON,
    BORNEO,
    SUMATRA,
    JAVA,
    NEW_GUINEA,
    SRI_LANKA,
    MADAGASCAR,
    NEW_ZEALAND_NORTH,
    NEW_ZEALAND_SOUTH,
    CUBA,
    HISPANIOLA,
];

const NORTH_AMERICA: &[(f32, f32)] = &[
    (-168.0, 66.0), (-162.0, 70.0), (-156.0, 71.3), (-141.0, 69.6), (-128.0, 70.0),
    (-115.0, 68.5), (-95.0, 68.0), (-88.0, 68.0), (-85.0, 66.0), (-87.0, 64.0),
    (-93.0, 61.0), (-94.0, 58.5), (-90.0, 57.0), (-85.0, 55.2), (-82.0, 52.5),
    (-79.0, 51.5), (-78.5, 55.0), (-77.0, 58.0), (-78.0, 62.0), (-73.0, 62.0),
    (-70.0, 61.0), (-65.0, 60.0), (-64.0, 58.0), (-61.0, 56.0), (-56.0, 52.0),
    (-59.0, 48.0), (-66.0, 44.5), (-70.0, 43.0), (-70.0, 41.5), (-74.0, 40.5),
    (-76.0, 35.0), (-81.5, 31.5), (-80.0, 25.5), (-82.0, 26.5), (-84.0, 30.0),
    (-89.0, 30.0), (-94.0, 29.5), (-97.0, 27.0), (-97.5, 22.0), (-95.0, 18.5),
    (-91.0, 19.0), (-90.0, 21.0), (-87.0, 21.5), (-88.0, 16.0), (-83.5, 15.0),
    (-83.5, 11.0), (-79.5, 9.0), (-77.5, 8.5), (-80.0, 7.5), (-83.0, 8.5),
    (-86.0, 11.0), (-88.0, 13.5), (-92.0, 14.5), (-96.0, 15.7), (-101.0, 17.5),
    (-105.5, 20.0), (-105.5, 23.0), (-109.5, 26.5), (-112.5, 29.5), (-114.5, 31.5),
    (-112.0, 26.0), (-110.0, 23.0), (-112.0, 24.5), (-114.5, 28.0), (-117.0, 32.5),
    (-120.5, 34.5), (-122.5, 37.5), (-124.0, 40.5), (-124.0, 46.0), (-124.5, 48.5),
    (-127.0, 50.5), (-131.0, 54.0), (-134.0, 57.5), (-140.0, 59.7), (-147.0, 60.5),
    (-152.0, 59.0), (-158.0, 57.5), (-162.0, 55.5), (-158.0, 58.5), (-162.0, 60.0),
    (-165.0, 62.5), (-164.0, 64.5),
];

const SOUTH_AMERICA: &[(f32, f32)] = &[
    (-77.5, 8.5), (-76.0, 9.5), (-75.5, 10.5), (-72.0, 12.0), (-68.0, 10.6),
    (-64.0, 10.7), (-61.5, 10.5), (-60.0, 8.5), (-57.0, 6.0), (-54.0, 5.7),
    (-51.5, 4.4), (-50.0, 1.8), (-48.0, -0.7), (-44.5, -2.5), (-39.0, -3.5),
    (-35.5, -5.2), (-34.8, -7.5), (-37.0, -10.8), (-39.0, -13.5), (-39.2, -17.8),
    (-40.8, -22.0), (-43.2, -23.0), (-48.6, -26.0), (-48.7, -28.5), (-52.0, -32.0),
    (-54.0, -34.8), (-57.5, -35.0), (-57.5, -38.3), (-62.0, -39.0), (-65.0, -41.0),
    (-63.5, -42.7), (-65.5, -45.0), (-67.5, -46.5), (-65.8, -47.8), (-68.4, -50.2),
    (-69.0, -52.3), (-68.5, -54.8), (-72.0, -54.0), (-75.0, -51.0), (-74.0, -46.5),
    (-73.5, -42.0), (-73.5, -37.0), (-71.5, -32.0), (-71.5, -25.0), (-70.3, -18.4),
    (-75.0, -15.5), (-77.5, -12.0), (-80.0, -7.0), (-81.2, -5.0), (-80.0, -2.5),
    (-80.8, -0.5), (-79.8, 1.0), (-77.5, 4.0), (-77.3, 7.5),
];

const EURASIA: &[(f32, f32)] = &[
    (-9.5, 37.0), (-9.5, 43.0), (-8.0, 43.7), (-1.5, 43.5), (-1.2, 46.0),
    (-4.5, 48.5), (-1.5, 49.7), (1.5, 50.9), (4.0, 51.5), (5.0, 53.3),
    (8.5, 53.9), (8.5, 57.0), (10.5, 57.7), (10.5, 55.0), (12.5, 54.5),
    (14.0, 54.0), (19.0, 54.5), (21.0, 55.5), (21.0, 57.0), (23.5, 59.3),
    (29.5, 60.0), (22.5, 60.3), (21.5, 61.5), (21.5, 63.5), (25.5, 65.0),
    (22.0, 65.8), (17.5, 62.5), (18.5, 60.0), (16.5, 57.0), (14.0, 55.5),
    (11.0, 58.8), (8.0, 58.0), (5.0, 59.0), (5.0, 62.0), (10.0, 64.0),
    (14.0, 67.5), (19.0, 70.0), (25.0, 71.0), (31.0, 70.0), (41.0, 67.0),
    (38.0, 64.5), (44.0, 66.5), (44.0, 68.5), (53.0, 68.5), (59.0, 69.0),
    (68.0, 69.0), (73.0, 72.5), (80.0, 73.5), (87.0, 74.0), (100.0, 76.5),
    (105.0, 77.7), (113.0, 74.0), (129.0, 72.0), (140.0, 72.5), (150.0, 71.5),
    (160.0, 70.0), (170.0, 69.5), (180.0, 68.5), (180.0, 65.0), (178.0, 64.5),
    (179.0, 62.5), (174.0, 61.8), (170.0, 60.0), (163.0, 59.8), (162.0, 57.5),
    (163.0, 56.0), (156.5, 51.0), (156.0, 57.0), (160.0, 61.5), (155.0, 59.3),
    (143.0, 59.3), (137.0, 54.0), (141.5, 53.0), (140.5, 48.5), (135.0, 43.5),
    (131.0, 42.7), (129.5, 40.5), (128.0, 38.5), (129.5, 35.3), (126.5, 34.4),
    (126.0, 37.5), (124.5, 40.0), (121.0, 40.8), (122.0, 39.0), (118.0, 39.0),
    (119.0, 37.0), (122.5, 37.3), (120.0, 34.5), (121.8, 31.0), (122.0, 29.5),
    (119.5, 25.5), (116.5, 23.0), (113.5, 22.3), (110.5, 21.0), (109.7, 21.5),
    (108.0, 21.5), (106.0, 19.5), (106.0, 18.0), (109.0, 15.0), (109.0, 11.5),
    (105.0, 8.6), (104.7, 10.3), (102.5, 12.3), (100.0, 13.5), (100.0, 12.0),
    (99.2, 9.2), (100.5, 7.2), (103.5, 4.5), (104.2, 1.4), (101.0, 2.5),
    (98.5, 7.9), (98.2, 9.5), (98.7, 14.0), (97.5, 16.5), (94.5, 16.0),
    (94.0, 19.0), (92.0, 21.5), (90.0, 21.8), (87.0, 21.5), (86.5, 20.0),
    (84.0, 18.0), (80.3, 15.5), (80.0, 10.3), (77.5, 8.0), (76.3, 9.5),
    (74.8, 12.8), (73.0, 18.5), (72.7, 21.0), (70.0, 21.0), (68.5, 23.5),
    (66.5, 25.4), (61.5, 25.2), (57.5, 25.8), (56.3, 27.2), (54.5, 26.6),
    (51.5, 27.9), (50.0, 30.0), (48.0, 30.0), (48.5, 28.2), (50.8, 24.7),
    (51.5, 25.5), (51.6, 24.2), (54.0, 24.2), (56.4, 26.3), (56.3, 24.8),
    (58.8, 23.5), (59.8, 22.3), (57.8, 19.0), (55.0, 17.0), (52.2, 15.6),
    (49.0, 14.0), (45.0, 12.8), (43.5, 12.7), (42.7, 15.5), (40.8, 19.5),
    (39.0, 21.5), (37.2, 25.0), (35.0, 28.0), (34.9, 29.5), (34.3, 27.8),
    (32.6, 29.9), (32.3, 31.2), (34.2, 31.3), (35.0, 33.0), (36.0, 34.7),
    (36.0, 36.7), (32.5, 36.1), (29.5, 36.3), (27.3, 37.0), (26.2, 39.3),
    (26.5, 40.7), (23.5, 40.3), (22.5, 40.0), (24.0, 38.0), (23.0, 36.5),
    (21.7, 36.8), (20.3, 39.6), (19.3, 41.8), (16.0, 43.5), (13.6, 45.6),
    (12.3, 45.3), (12.6, 44.0), (14.0, 42.5), (16.0, 41.4), (18.5, 40.2),
    (17.0, 39.0), (16.0, 38.0), (15.6, 40.1), (12.0, 41.8), (10.5, 43.0),
    (8.8, 44.4), (6.5, 43.1), (3.2, 43.2), (3.2, 41.9), (0.5, 40.5),
    (-0.3, 39.4), (0.2, 38.7), (-0.7, 37.6), (-2.1, 36.7), (-5.6, 36.0),
    (-6.5, 36.9),
];

const AFRICA: &[(f32, f32)] = &[
    (32.6, 29.9), (34.0, 27.0), (35.8, 23.5), (37.3, 21.0), (38.5, 18.0),
    (39.7, 15.5), (41.7, 13.5), (43.3, 11.5), (44.5, 10.4), (51.2, 11.8),
    (51.0, 10.4), (49.5, 6.0), (47.5, 3.5), (44.0, -0.5), (41.5, -1.8),
    (40.0, -4.0), (39.2, -7.0), (39.8, -10.2), (40.5, -15.0), (37.0, -17.5),
    (35.3, -22.0), (32.9, -26.0), (32.5, -28.6), (30.0, -31.3), (27.0, -33.6),
    (22.5, -34.0), (20.0, -34.8), (18.4, -34.2), (18.0, -32.0), (15.0, -27.0),
    (14.5, -22.5), (11.8, -17.0), (12.3, -13.0), (13.5, -11.0), (12.2, -6.0),
    (9.5, -2.0), (9.5, 1.0), (9.7, 4.0), (8.5, 4.5), (6.0, 4.3),
    (4.5, 6.3), (1.5, 6.1), (-2.0, 4.7), (-5.0, 5.1), (-7.5, 4.4),
    (-10.5, 6.5), (-13.0, 8.5), (-15.0, 11.0), (-16.7, 12.5), (-17.5, 14.7),
    (-16.5, 19.5), (-17.0, 21.0), (-15.0, 24.5), (-13.0, 27.5), (-9.8, 29.8),
    (-9.5, 32.5), (-6.8, 34.0), (-5.9, 35.8), (-2.2, 35.1), (1.0, 36.5),
    (3.0, 36.8), (8.6, 36.9), (10.3, 37.3), (11.0, 36.8), (10.5, 35.7),
    (11.1, 33.3), (15.2, 32.3), (19.0, 30.3), (20.0, 30.9), (20.1, 32.3),
    (22.2, 33.0), (25.0, 31.7), (29.0, 30.9), (32.3, 31.2),
];

const AUSTRALIA: &[(f32, f32)] = &[
    (113.5, -22.0), (114.0, -26.5), (115.0, -30.0), (115.0, -34.0), (118.0, -35.0),
    (123.5, -33.8), (129.0, -31.6), (131.5, -31.5), (134.0, -32.5), (135.5, -34.8),
    (137.8, -33.0), (138.0, -35.5), (139.6, -37.0), (140.5, -38.0), (144.0, -38.2),
    (146.5, -39.0), (150.0, -37.5), (151.3, -33.8), (153.5, -28.5), (153.0, -25.0),
    (150.5, -22.5), (146.3, -19.0), (145.3, -15.0), (143.5, -14.0), (142.5, -10.7),
    (141.6, -12.8), (141.5, -17.0), (139.5, -17.5), (136.0, -15.5), (136.8, -12.2),
    (132.6, -11.3), (130.0, -13.0), (129.5, -15.0), (126.0, -14.0), (122.5, -17.0),
    (121.0, -19.5), (117.0, -20.6),
];

const ANTARCTICA: &[(f32, f32)] = &[
    (-180.0, -78.0), (-160.0, -77.0), (-150.0, -76.0), (-130.0, -74.0), (-110.0, -74.0),
    (-100.0, -73.0), (-80.0, -73.0), (-70.0, -70.0), (-62.0, -65.0), (-57.0, -63.3),
    (-60.0, -68.0), (-62.0, -72.0), (-60.0, -75.0), (-45.0, -78.0), (-30.0, -77.0),
    (-20.0, -73.0), (-10.0, -71.0), (0.0, -70.0), (20.0, -70.0), (40.0, -69.0),
    (55.0, -67.0), (70.0, -68.0), (75.0, -69.5), (90.0, -66.5), (110.0, -66.0),
    (130.0, -66.0), (150.0, -68.0), (165.0, -71.0), (170.0, -72.0), (180.0, -78.0),
    (180.0, -90.0), (-180.0, -90.0),
];

const GREENLAND: &[(f32, f32)] = &[
    (-73.0, 78.0), (-66.0, 80.5), (-60.0, 82.0), (-40.0, 83.5), (-22.0, 82.5),
    (-18.0, 80.0), (-19.0, 76.0), (-22.0, 72.0), (-25.0, 69.0), (-32.0, 68.0),
    (-40.0, 65.0), (-43.0, 60.0), (-49.0, 61.5), (-52.0, 65.0), (-54.0, 69.0),
    (-56.0, 72.0), (-60.0, 75.5),
];

const BAFFIN: &[(f32, f32)] = &[
    (-80.0, 73.5), (-72.0, 71.5), (-67.0, 69.5), (-62.0, 66.8), (-64.5, 63.5),
    (-71.0, 62.8), (-74.5, 64.5), (-78.0, 64.3), (-81.5, 67.0), (-83.0, 69.7),
    (-88.0, 70.5), (-88.0, 73.5),
];

const ELLESMERE: &[(f32, f32)] = &[
    (-90.0, 76.5), (-78.0, 76.5), (-75.0, 79.0), (-62.0, 82.0), (-75.0, 83.0),
    (-90.0, 81.5),
];

const VICTORIA_ISLAND: &[(f32, f32)] = &[
    (-117.0, 69.0), (-101.0, 69.0), (-101.0, 73.0), (-118.0, 73.5),
];

const GREAT_BRITAIN: &[(f32, f32)] = &[
    (-5.7, 50.1), (1.3, 51.1), (1.7, 52.7), (0.0, 53.5), (-1.5, 55.0),
    (-2.0, 56.0), (-1.8, 57.6), (-4.0, 58.6), (-5.0, 58.6), (-6.0, 57.5),
    (-5.6, 56.0), (-4.8, 54.8), (-3.0, 53.9), (-3.1, 53.2), (-4.5, 53.3),
    (-4.1, 52.3), (-5.3, 51.8), (-3.2, 51.4),
];

const IRELAND: &[(f32, f32)] = &[
    (-6.0, 52.2), (-6.0, 53.9), (-5.7, 54.8), (-7.5, 55.3), (-10.0, 54.2),
    (-9.5, 53.2), (-10.3, 51.6), (-8.0, 51.6),
];

const ICELAND: &[(f32, f32)] = &[
    (-24.0, 65.5), (-22.0, 66.4), (-16.0, 66.5), (-13.5, 65.2), (-15.0, 64.2),
    (-19.0, 63.4), (-22.5, 63.8),
];

const JAPAN: &[(f32, f32)] = &[
    (130.0, 31.5), (131.5, 31.3), (132.0, 33.8), (135.2, 33.6), (137.0, 34.6),
    (139.8, 34.9), (140.8, 36.0), (141.0, 38.3), (142.0, 39.5), (141.3, 41.4),
    (143.3, 42.0), (145.5, 43.3), (141.8, 45.4), (140.0, 43.0), (140.0, 41.4),
    (139.9, 40.0), (139.0, 38.0), (136.8, 37.2), (135.5, 35.6), (132.5, 35.4),
    (130.9, 34.0), (129.7, 33.2),
];

const SAKHALIN: &[(f32, f32)] = &[
    (142.0, 54.2), (143.3, 52.5), (143.5, 49.0), (142.0, 46.0), (141.8, 48.0),
    (142.2, 51.5),
];

const TAIWAN: &[(f32, f32)] = &[(121.5, 25.3), (121.9, 24.5), (120.9, 22.0), (120.1, 23.0)];

const LUZON: &[(f32, f32)] = &[
    (120.6, 18.5), (122.2, 18.5), (122.0, 16.2), (124.0, 13.0), (121.0, 13.8),
    (120.0, 16.0),
];

const BORNEO: &[(f32, f32)] = &[
    (109.6, 2.0), (111.0, 1.5), (113.0, 3.2), (115.5, 5.2), (117.0, 7.0),
    (119.0, 5.0), (118.0, 1.0), (117.5, -0.5), (116.0, -3.8), (114.5, -3.8),
    (111.0, -3.0), (110.0, -1.5), (109.0, 0.5),
];

const SUMATRA: &[(f32, f32)] = &[
    (95.3, 5.6), (97.5, 5.2), (100.3, 2.2), (103.7, -0.8), (106.0, -3.0),
    (105.8, -5.8), (104.5, -5.9), (101.5, -3.0), (98.7, 1.7),
];

const JAVA: &[(f32, f32)] = &[
    (105.2, -6.8), (106.0, -5.9), (110.5, -6.9), (114.5, -7.7), (114.4, -8.7),
    (110.5, -8.2),
];

const NEW_GUINEA: &[(f32, f32)] = &[
    (131.0, -1.0), (134.0, -0.9), (137.0, -1.5), (141.0, -2.6), (145.0, -4.3),
    (147.5, -6.0), (147.8, -8.0), (150.5, -10.3), (147.0, -10.1), (143.5, -9.0),
    (142.5, -9.3), (141.0, -9.1), (138.0, -8.3), (137.8, -5.3), (134.0, -4.0),
    (132.0, -2.8),
];

const SRI_LANKA: &[(f32, f32)] = &[(79.9, 9.8), (81.9, 7.5), (81.2, 6.1), (80.0, 6.1)];

const MADAGASCAR: &[(f32, f32)] = &[
    (49.3, -12.0), (50.5, -15.5), (49.6, -17.5), (47.2, -24.8), (45.1, -25.5),
    (43.6, -23.0), (44.2, -20.0), (44.4, -16.2), (47.0, -15.5),
];

const NEW_ZEALAND_NORTH: &[(f32, f32)] = &[
    (172.7, -34.4), (174.5, -36.0), (175.9, -37.4), (178.5, -37.7), (177.0, -39.5),
    (176.0, -41.3), (174.6, -41.3), (174.8, -39.8), (173.8, -39.2), (174.7, -37.2),
];

const NEW_ZEALAND_SOUTH: &[(f32, f32)] = &[
    (172.7, -40.5), (174.3, -41.5), (173.5, -42.8), (171.3, -44.4), (170.7, -45.9),
    (169.0, -46.7), (166.5, -46.0), (168.3, -44.0), (171.3, -41.7),
];

const CUBA: &[(f32, f32)] = &[
    (-84.9, 21.9), (-82.0, 23.2), (-77.5, 22.3), (-74.2, 20.2), (-77.7, 19.9),
    (-80.0, 21.8),
];

const HISPANIOLA: &[(f32, f32)] = &[
    (-74.4, 18.5), (-74.4, 19.8), (-72.8, 19.9), (-69.3, 19.4), (-68.4, 18.6),
    (-71.4, 17.6),
];

/// Longitudes where the parallel at `lat` crosses the ring's edges, sorted.
fn ring_crossings(ring: &[(f32, f32)], lat: f32) -> Vec<f32> {
    let mut xs = Vec::new();
    for (i, &(lon_a, lat_a)) in ring.iter().enumerate() {
        let (lon_b, lat_b) = ring[(i + 1) % ring.len()];
        if (lat_a <= lat) != (lat_b <= lat) {
            xs.push(lon_a + (lat - lat_a) * (lon_b - lon_a) / (lat_b - lat_a));
        }
    }
    xs.sort_by(f32::total_cmp);
    xs
}

/// Even-odd test against the coastline rings.
pub fn is_land(latitude_deg: f32, longitude_deg: f32) -> bool {
    LANDMASSES.iter().any(|ring| {
        ring_crossings(ring, latitude_deg)
            .iter()
            .filter(|&&x| x < longitude_deg)
            .count()
            % 2
            == 1
    })
}

fn on_graticule(deg: f32, half_pixel_deg: f32) -> bool {
    let r = deg.rem_euclid(GRATICULE_STEP_DEG);
    r < half_pixel_deg || GRATICULE_STEP_DEG - r <= half_pixel_deg
}

fn darken([r, g, b]: [u8; 3]) -> [u8; 3] {
    [r / 2 + 20, g / 2 + 20, b / 2 + 20]
}

/// Rasterize the basemap. Rows are filled by scanline, one parallel per row.
pub fn generate_basemap(width: u32, height: u32) -> Image {
    let width = width.max(8);
    let height = height.max(4);
    let (w, h) = (width as usize, height as usize);
    let deg_per_px_x = 360.0 / width as f32;
    let deg_per_px_y = 180.0 / height as f32;

    let mut data = vec![0u8; w * h * 4];
    let mut land_row = vec![false; w];

    for y in 0..h {
        let lat = 90.0 - (y as f32 + 0.5) * deg_per_px_y;

        land_row.fill(false);
        for ring in LANDMASSES {
            for span in ring_crossings(ring, lat).chunks_exact(2) {
                let x0 = ((span[0] + 180.0) / deg_per_px_x - 0.5).ceil().max(0.0) as usize;
                let x1 = ((span[1] + 180.0) / deg_per_px_x - 0.5).ceil().max(0.0) as usize;
                for cell in land_row.iter_mut().take(x1.min(w)).skip(x0) {
                    *cell = true;
                }
            }
        }

        let lat_line = on_graticule(lat, deg_per_px_y * 0.5);
        for (x, &land) in land_row.iter().enumerate() {
            let lon = -180.0 + (x as f32 + 0.5) * deg_per_px_x;
            let base = match (land, lat.abs() > 62.0) {
                (true, true) => ICE,
                (true, false) => LAND,
                (false, _) => OCEAN,
            };
            let [r, g, b] = if lat_line || on_graticule(lon, deg_per_px_x * 0.5) {
                darken(base)
            } else {
                base
            };
            let i = (y * w + x) * 4;
            data[i..i + 4].copy_from_slice(&[r, g, b, 255]);
        }
    }

    Image::new(
        Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        data,
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::RENDER_WORLD,
    )
}
