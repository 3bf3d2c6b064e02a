#[macro_use]
extern crate rocket;

#[launch]
fn rocket() -> _ {
    gacha_cardgame::rocket_initialize()
}
