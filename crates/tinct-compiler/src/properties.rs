//! CSS Property Table
//!
//! Every supported property and the handler that parses its value.
//! Uses an enum so the dispatch is checked at compile time.

use crate::declarations::{self, effects, shorthands, transform, Handler};

/// Property identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    // Layout keywords
    Display,
    Position,
    Overflow,
    BoxSizing,
    Direction,
    BackfaceVisibility,
    PointerEvents,
    UserSelect,
    ObjectFit,
    Cursor,

    // Flexbox
    Flex,
    FlexFlow,
    FlexDirection,
    FlexWrap,
    FlexGrow,
    FlexShrink,
    FlexBasis,
    JustifyContent,
    AlignItems,
    AlignSelf,
    AlignContent,
    Gap,
    RowGap,
    ColumnGap,

    // Box model
    Width,
    Height,
    MinWidth,
    MinHeight,
    MaxWidth,
    MaxHeight,
    AspectRatio,
    Margin,
    MarginTop,
    MarginRight,
    MarginBottom,
    MarginLeft,
    MarginBlock,
    MarginInline,
    MarginInlineStart,
    MarginInlineEnd,
    Padding,
    PaddingTop,
    PaddingRight,
    PaddingBottom,
    PaddingLeft,
    PaddingBlock,
    PaddingInline,
    PaddingInlineStart,
    PaddingInlineEnd,

    // Positioning
    Top,
    Right,
    Bottom,
    Left,
    Inset,
    InsetBlock,
    InsetInline,
    ZIndex,

    // Border & outline
    Border,
    BorderTop,
    BorderRight,
    BorderBottom,
    BorderLeft,
    BorderWidth,
    BorderTopWidth,
    BorderRightWidth,
    BorderBottomWidth,
    BorderLeftWidth,
    BorderColor,
    BorderTopColor,
    BorderRightColor,
    BorderBottomColor,
    BorderLeftColor,
    BorderStyle,
    BorderRadius,
    BorderTopLeftRadius,
    BorderTopRightRadius,
    BorderBottomLeftRadius,
    BorderBottomRightRadius,
    Outline,
    OutlineWidth,
    OutlineColor,
    OutlineStyle,
    OutlineOffset,

    // Colours & background
    Color,
    BackgroundColor,
    Background,
    BackgroundImage,
    Opacity,

    // Text
    Font,
    FontFamily,
    FontSize,
    FontWeight,
    FontStyle,
    FontVariant,
    LineHeight,
    LetterSpacing,
    TextAlign,
    TextTransform,
    TextDecoration,
    TextDecorationLine,
    TextDecorationStyle,
    TextDecorationColor,
    VerticalAlign,
    LineClamp,

    // Effects
    BoxShadow,
    TextShadow,
    Transform,
    TransformOrigin,
    Translate,
    Rotate,
    Scale,

    // Animation & transition
    Animation,
    AnimationName,
    AnimationDuration,
    AnimationDelay,
    AnimationTimingFunction,
    AnimationIterationCount,
    AnimationDirection,
    AnimationFillMode,
    AnimationPlayState,
    Transition,
    TransitionProperty,
    TransitionDuration,
    TransitionDelay,
    TransitionTimingFunction,

    // Containers
    Container,
    ContainerName,
    ContainerType,
}

impl Property {
    /// Parse a property name into a Property
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "display" => Self::Display,
            "position" => Self::Position,
            "overflow" => Self::Overflow,
            "box-sizing" => Self::BoxSizing,
            "direction" => Self::Direction,
            "backface-visibility" => Self::BackfaceVisibility,
            "pointer-events" => Self::PointerEvents,
            "user-select" => Self::UserSelect,
            "object-fit" => Self::ObjectFit,
            "cursor" => Self::Cursor,

            "flex" => Self::Flex,
            "flex-flow" => Self::FlexFlow,
            "flex-direction" => Self::FlexDirection,
            "flex-wrap" => Self::FlexWrap,
            "flex-grow" => Self::FlexGrow,
            "flex-shrink" => Self::FlexShrink,
            "flex-basis" => Self::FlexBasis,
            "justify-content" => Self::JustifyContent,
            "align-items" => Self::AlignItems,
            "align-self" => Self::AlignSelf,
            "align-content" => Self::AlignContent,
            "gap" => Self::Gap,
            "row-gap" => Self::RowGap,
            "column-gap" => Self::ColumnGap,

            "width" => Self::Width,
            "height" => Self::Height,
            "min-width" => Self::MinWidth,
            "min-height" => Self::MinHeight,
            "max-width" => Self::MaxWidth,
            "max-height" => Self::MaxHeight,
            "aspect-ratio" => Self::AspectRatio,

            "margin" => Self::Margin,
            "margin-top" => Self::MarginTop,
            "margin-right" => Self::MarginRight,
            "margin-bottom" => Self::MarginBottom,
            "margin-left" => Self::MarginLeft,
            "margin-block" => Self::MarginBlock,
            "margin-inline" => Self::MarginInline,
            "margin-inline-start" => Self::MarginInlineStart,
            "margin-inline-end" => Self::MarginInlineEnd,

            "padding" => Self::Padding,
            "padding-top" => Self::PaddingTop,
            "padding-right" => Self::PaddingRight,
            "padding-bottom" => Self::PaddingBottom,
            "padding-left" => Self::PaddingLeft,
            "padding-block" => Self::PaddingBlock,
            "padding-inline" => Self::PaddingInline,
            "padding-inline-start" => Self::PaddingInlineStart,
            "padding-inline-end" => Self::PaddingInlineEnd,

            "top" => Self::Top,
            "right" => Self::Right,
            "bottom" => Self::Bottom,
            "left" => Self::Left,
            "inset" => Self::Inset,
            "inset-block" => Self::InsetBlock,
            "inset-inline" => Self::InsetInline,
            "z-index" => Self::ZIndex,

            "border" => Self::Border,
            "border-top" => Self::BorderTop,
            "border-right" => Self::BorderRight,
            "border-bottom" => Self::BorderBottom,
            "border-left" => Self::BorderLeft,
            "border-width" => Self::BorderWidth,
            "border-top-width" => Self::BorderTopWidth,
            "border-right-width" => Self::BorderRightWidth,
            "border-bottom-width" => Self::BorderBottomWidth,
            "border-left-width" => Self::BorderLeftWidth,
            "border-color" => Self::BorderColor,
            "border-top-color" => Self::BorderTopColor,
            "border-right-color" => Self::BorderRightColor,
            "border-bottom-color" => Self::BorderBottomColor,
            "border-left-color" => Self::BorderLeftColor,
            "border-style" => Self::BorderStyle,
            "border-radius" => Self::BorderRadius,
            "border-top-left-radius" => Self::BorderTopLeftRadius,
            "border-top-right-radius" => Self::BorderTopRightRadius,
            "border-bottom-left-radius" => Self::BorderBottomLeftRadius,
            "border-bottom-right-radius" => Self::BorderBottomRightRadius,
            "outline" => Self::Outline,
            "outline-width" => Self::OutlineWidth,
            "outline-color" => Self::OutlineColor,
            "outline-style" => Self::OutlineStyle,
            "outline-offset" => Self::OutlineOffset,

            "color" => Self::Color,
            "background-color" => Self::BackgroundColor,
            "background" => Self::Background,
            "background-image" => Self::BackgroundImage,
            "opacity" => Self::Opacity,

            "font" => Self::Font,
            "font-family" => Self::FontFamily,
            "font-size" => Self::FontSize,
            "font-weight" => Self::FontWeight,
            "font-style" => Self::FontStyle,
            "font-variant" => Self::FontVariant,
            "line-height" => Self::LineHeight,
            "letter-spacing" => Self::LetterSpacing,
            "text-align" => Self::TextAlign,
            "text-transform" => Self::TextTransform,
            "text-decoration" => Self::TextDecoration,
            "text-decoration-line" => Self::TextDecorationLine,
            "text-decoration-style" => Self::TextDecorationStyle,
            "text-decoration-color" => Self::TextDecorationColor,
            "vertical-align" => Self::VerticalAlign,
            "line-clamp" | "-webkit-line-clamp" => Self::LineClamp,

            "box-shadow" => Self::BoxShadow,
            "text-shadow" => Self::TextShadow,
            "transform" => Self::Transform,
            "transform-origin" => Self::TransformOrigin,
            "translate" => Self::Translate,
            "rotate" => Self::Rotate,
            "scale" => Self::Scale,

            "animation" => Self::Animation,
            "animation-name" => Self::AnimationName,
            "animation-duration" => Self::AnimationDuration,
            "animation-delay" => Self::AnimationDelay,
            "animation-timing-function" => Self::AnimationTimingFunction,
            "animation-iteration-count" => Self::AnimationIterationCount,
            "animation-direction" => Self::AnimationDirection,
            "animation-fill-mode" => Self::AnimationFillMode,
            "animation-play-state" => Self::AnimationPlayState,
            "transition" => Self::Transition,
            "transition-property" => Self::TransitionProperty,
            "transition-duration" => Self::TransitionDuration,
            "transition-delay" => Self::TransitionDelay,
            "transition-timing-function" => Self::TransitionTimingFunction,

            "container" => Self::Container,
            "container-name" => Self::ContainerName,
            "container-type" => Self::ContainerType,

            _ => return None,
        })
    }

    /// Animation and transition properties flag their rule as animated
    pub fn is_animation(self) -> bool {
        matches!(
            self,
            Self::Animation
                | Self::AnimationName
                | Self::AnimationDuration
                | Self::AnimationDelay
                | Self::AnimationTimingFunction
                | Self::AnimationIterationCount
                | Self::AnimationDirection
                | Self::AnimationFillMode
                | Self::AnimationPlayState
                | Self::Transition
                | Self::TransitionProperty
                | Self::TransitionDuration
                | Self::TransitionDelay
                | Self::TransitionTimingFunction
        )
    }

    /// Accepted keywords for keyword-valued properties
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::Display => &["flex", "none", "contents"],
            Self::Position => &["absolute", "relative", "static"],
            Self::Overflow => &["visible", "hidden", "scroll"],
            Self::BoxSizing => &["border-box", "content-box"],
            Self::Direction => &["ltr", "rtl", "inherit"],
            Self::BackfaceVisibility => &["visible", "hidden"],
            Self::PointerEvents => &["auto", "none", "box-none", "box-only"],
            Self::UserSelect => &["auto", "none", "text", "contain", "all"],
            Self::ObjectFit => &["cover", "contain", "fill", "scale-down", "none"],
            Self::Cursor => &["auto", "pointer"],
            Self::FlexDirection => &["row", "row-reverse", "column", "column-reverse"],
            Self::FlexWrap => &["wrap", "nowrap", "wrap-reverse"],
            Self::JustifyContent => &[
                "flex-start",
                "flex-end",
                "center",
                "space-between",
                "space-around",
                "space-evenly",
            ],
            Self::AlignItems => &["flex-start", "flex-end", "center", "stretch", "baseline"],
            Self::AlignSelf => &["auto", "flex-start", "flex-end", "center", "stretch", "baseline"],
            Self::AlignContent => &[
                "flex-start",
                "flex-end",
                "center",
                "stretch",
                "space-between",
                "space-around",
                "space-evenly",
            ],
            Self::BorderStyle | Self::OutlineStyle => &["solid", "dotted", "dashed"],
            Self::FontStyle => &["normal", "italic"],
            Self::TextAlign => &["auto", "left", "right", "center", "justify"],
            Self::TextTransform => &["none", "uppercase", "lowercase", "capitalize"],
            Self::TextDecorationLine => &["none", "underline", "line-through"],
            Self::TextDecorationStyle => &["solid", "double", "dotted", "dashed"],
            Self::VerticalAlign => &["auto", "top", "bottom", "middle"],
            _ => &[],
        }
    }

    /// Parser for this property's value
    pub fn handler(self) -> Handler {
        match self {
            Self::Display
            | Self::Position
            | Self::Overflow
            | Self::BoxSizing
            | Self::Direction
            | Self::BackfaceVisibility
            | Self::PointerEvents
            | Self::UserSelect
            | Self::ObjectFit
            | Self::Cursor
            | Self::FlexDirection
            | Self::FlexWrap
            | Self::JustifyContent
            | Self::AlignItems
            | Self::AlignSelf
            | Self::AlignContent
            | Self::BorderStyle
            | Self::OutlineStyle
            | Self::FontStyle
            | Self::TextAlign
            | Self::TextTransform
            | Self::TextDecorationStyle
            | Self::VerticalAlign => declarations::keyword,
            Self::TextDecorationLine => declarations::text_decoration_line,

            Self::Width
            | Self::Height
            | Self::MinWidth
            | Self::MinHeight
            | Self::MaxWidth
            | Self::MaxHeight
            | Self::MarginTop
            | Self::MarginRight
            | Self::MarginBottom
            | Self::MarginLeft
            | Self::PaddingTop
            | Self::PaddingRight
            | Self::PaddingBottom
            | Self::PaddingLeft
            | Self::Top
            | Self::Right
            | Self::Bottom
            | Self::Left
            | Self::RowGap
            | Self::ColumnGap
            | Self::FlexBasis
            | Self::BorderTopWidth
            | Self::BorderRightWidth
            | Self::BorderBottomWidth
            | Self::BorderLeftWidth
            | Self::BorderTopLeftRadius
            | Self::BorderTopRightRadius
            | Self::BorderBottomLeftRadius
            | Self::BorderBottomRightRadius
            | Self::OutlineWidth
            | Self::OutlineOffset
            | Self::FontSize
            | Self::LetterSpacing => declarations::length,
            Self::MarginInlineStart | Self::PaddingInlineStart => declarations::inline_start,
            Self::MarginInlineEnd | Self::PaddingInlineEnd => declarations::inline_end,

            Self::Opacity | Self::FlexGrow | Self::FlexShrink | Self::ZIndex => {
                declarations::number
            }
            Self::AspectRatio => declarations::aspect_ratio,
            Self::LineClamp => declarations::line_clamp,
            Self::LineHeight => declarations::line_height,
            Self::FontWeight => declarations::font_weight,
            Self::FontFamily => declarations::font_family,
            Self::FontVariant => declarations::font_variant,

            Self::Color
            | Self::BackgroundColor
            | Self::BorderTopColor
            | Self::BorderRightColor
            | Self::BorderBottomColor
            | Self::BorderLeftColor
            | Self::OutlineColor
            | Self::TextDecorationColor => declarations::color,

            Self::Margin | Self::Padding => shorthands::box_edges,
            Self::Inset => shorthands::inset,
            Self::MarginBlock | Self::PaddingBlock | Self::InsetBlock => shorthands::block_axis,
            Self::MarginInline | Self::PaddingInline | Self::InsetInline => shorthands::inline_axis,
            Self::Gap => shorthands::gap,
            Self::BorderWidth => shorthands::border_width,
            Self::BorderColor => shorthands::border_color,
            Self::BorderRadius => shorthands::border_radius,
            Self::Border
            | Self::BorderTop
            | Self::BorderRight
            | Self::BorderBottom
            | Self::BorderLeft => {
                shorthands::border
            }
            Self::Outline => shorthands::outline,
            Self::Flex => shorthands::flex,
            Self::FlexFlow => shorthands::flex_flow,
            Self::Font => shorthands::font,
            Self::TextDecoration => shorthands::text_decoration,
            Self::Background => shorthands::background,
            Self::BackgroundImage => shorthands::background_image,

            Self::Transform => transform::transform,
            Self::Translate => transform::translate,
            Self::Rotate => transform::rotate,
            Self::Scale => transform::scale,
            Self::TransformOrigin => transform::transform_origin,

            Self::BoxShadow => effects::box_shadow,
            Self::TextShadow => effects::text_shadow,

            Self::Animation => effects::animation,
            Self::AnimationName => effects::animation_name,
            Self::AnimationDuration | Self::AnimationDelay => effects::times,
            Self::AnimationTimingFunction | Self::TransitionTimingFunction => {
                effects::timing_functions
            }
            Self::AnimationIterationCount => effects::iteration_count,
            Self::AnimationDirection | Self::AnimationFillMode | Self::AnimationPlayState => {
                effects::animation_keywords
            }
            Self::Transition => effects::transition,
            Self::TransitionProperty => effects::transition_property,
            Self::TransitionDuration | Self::TransitionDelay => effects::times,

            Self::Container => effects::container,
            Self::ContainerName => effects::container_name,
            Self::ContainerType => effects::container_type,
        }
    }
}
