#[rocket::launch]
fn rocket() -> _ {
    let rocket = consultancy_api::rocket();
    log::info!("Starting Consultancy API Server");
    rocket
}
