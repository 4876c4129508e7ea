pub mod feed;
pub mod icons;
pub mod post_card;
