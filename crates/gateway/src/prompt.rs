//! Instruction text sent alongside the source photo.

use shared::AgeCategory;

/// Builds the character instruction for a given age label.
///
/// The template depends on nothing but `age_label`, so relabeling the age
/// categories never requires touching this text.
pub fn character_prompt(age_label: &str) -> String {
    format!(
        "Transform the person in this image into a premium, extremely adorable 3D character \
in the style of high-end animation studios.

CORE REQUIREMENTS:
1. FULL BODY VIEW: Render the character from head to toe. The entire body silhouette must be visible.
2. CHARACTER STYLE: Extremely adorable, soft rounded shapes, pastel colors, oversized eyes, \
chibi-like proportions. High-end toy aesthetic.
3. AGE APPEARANCE: Target age group: {age_label}.
4. VISUAL FIDELITY: 4K rendering, professional studio lighting, subsurface scattering on skin \
for a soft glow, and high-detail fabric textures.
5. COMPOSITION: Center the character with generous safe margins from all edges. No part of \
the character may be cropped.
6. BACKGROUND: A clean, simple, slightly blurred background that complements the character's colors.

Keep the original person's key features (hair color, skin tone, general facial structure) but \
translate them into this highly stylized 3D toy/animation aesthetic. Make it look professional \
and collectible, like a high-quality figurine."
    )
}

pub fn prompt_for(age: AgeCategory) -> String {
    character_prompt(age.label())
}
