mod cors;
mod health;
mod helpers;
mod mail;
mod mentor;
mod projects;
mod recommend;
mod requests;
mod signed_url;
mod talent;
