use axum::{
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;

use crate::route::{
    booking::{all_slots, cancel_slot, my_bookings, reserve_slot},
    category::{
        add_category, delete_category_route, read_categories, read_category_by_id,
        update_category_route,
    },
    event::{add_event, delete_event_route, read_event_by_id, update_event_route},
    user::{login, me, read_user, read_users, register},
};

pub fn create_router(pool: PgPool) -> Router {
    Router::new()
        //auth
        .route("/register", post(register))                              //create account, open to anyone
        .route("/login", post(login))                                    //exchange credentials for a bearer token
        //users
        .route("/me", get(me))                                           //profile of the token holder
        .route("/users", get(read_users))                                //list all users
        .route("/users/{user_id}", get(read_user))                       //get user by id
        //bookings
        .route("/reserve_slot", post(reserve_slot))                      //book a time slot, one booking per slot
        .route("/cancel_slot/{event_id}", delete(cancel_slot))           //cancel your own booking for the slot
        .route("/all_slots", get(all_slots))                             //list all slots with booking status
        .route("/my_bookings", get(my_bookings))                         //booking history of the token holder
        //categories
        .route("/categories", post(add_category))                        //create category, admin only
        .route("/categories", get(read_categories))                      //list categories with event counts
        .route("/categories/{category_id}", get(read_category_by_id))    //get category by id, admin only
        .route("/category", put(update_category_route))                  //partial update, admin only
        .route("/category/{category_id}", delete(delete_category_route)) //delete category, blocked while events reference it, admin only
        //events
        .route("/create_event", post(add_event))                         //create event slot, admin only
        .route("/event/{event_id}", get(read_event_by_id))               //get event by id
        .route("/event", put(update_event_route))                        //partial update, admin only
        .route("/event/{event_id}", delete(delete_event_route))          //delete event, blocked while booked, admin only
        .with_state(pool)
}
