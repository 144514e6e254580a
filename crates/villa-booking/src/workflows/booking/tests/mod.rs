mod common;
mod dates;
mod promo;
