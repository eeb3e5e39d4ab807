pub mod bug;
pub mod bug_group;
pub mod group_admin;
pub mod group_invitation;
pub mod group_member;
pub mod payment;
pub mod session;
pub mod subscription;
pub mod user;

/*
 A user can sit in any number of groups. Membership and the admin flag are two
 separate join tables: being an admin never implies a role, and a role
 (member/developer) never implies admin rights. The group creator gets both rows
 at creation time.
 Bug submission is metered per reporter, not per group, through their subscription.
 */
