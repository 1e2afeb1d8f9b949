// Glimmer
// Copyright (C) 2025 Synerthink

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

use crate::vec3::Color;

/// Turns an accumulated color sum into a displayable 8-bit pixel: average
/// over the sample count, gamma-correct with a square root, clamp to 0.999
/// and quantize. Each channel maps to `floor(256 * clamp(sqrt(sum / S)))`.
pub fn to_rgb8(accumulated: Color, samples_per_pixel: u32) -> [u8; 3] {
    let scale = 1.0 / f64::from(samples_per_pixel);
    [
        quantize((scale * accumulated.x).sqrt()),
        quantize((scale * accumulated.y).sqrt()),
        quantize((scale * accumulated.z).sqrt()),
    ]
}

fn quantize(channel: f64) -> u8 {
    (256.0 * channel.clamp(0.0, 0.999)) as u8
}
