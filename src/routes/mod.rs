use crate::utils::webutils::validate_token;
use actix_web::web;
use actix_web_httpauth::middleware::HttpAuthentication;

pub mod bug;
pub mod group;
pub mod health;
pub mod invitation;
pub mod payment;
pub mod subscription;
pub mod user;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    let user_auth = HttpAuthentication::bearer(validate_token);

    cfg.service(web::scope("/health").service(health::health));
    cfg.service(
        web::scope("/user")
            .service(user::signup::signup)
            .service(user::login::login)
            .service(
                web::scope("")
                    .service(user::logout::logout)
                    .service(user::me::me)
                    .wrap(user_auth.clone()),
            ),
    );
    cfg.service(
        web::scope("/group")
            .service(group::create::create_group)
            .service(group::list::list_groups)
            .service(group::detail::group_detail)
            .service(group::delete::delete_group)
            .service(group::leave::leave_group)
            .service(group::admin::invite::invite)
            .service(group::admin::invitations::list_group_invitations)
            .service(group::admin::invitations::cancel_invitation)
            .service(group::admin::members::make_admin)
            .service(group::admin::members::set_role)
            .service(group::admin::members::remove_member)
            .service(bug::list::list_bugs)
            .service(bug::create::create_bug)
            .service(bug::update::update_status)
            .service(bug::delete::delete_bug)
            .service(bug::attachment::download_attachment)
            .wrap(user_auth.clone()),
    );
    cfg.service(
        web::scope("/invitation")
            .service(invitation::list::list_invitations)
            .service(invitation::respond::accept)
            .service(invitation::respond::reject)
            .wrap(user_auth.clone()),
    );
    cfg.service(
        web::scope("/subscription")
            .service(subscription::status::status)
            .service(subscription::checkout::checkout)
            .service(subscription::payments::list_payments)
            .wrap(user_auth),
    );
    cfg.service(web::scope("/payment").service(payment::callback::callback));
}
