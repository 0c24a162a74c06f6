pub mod dispatch {
    pub mod queue;
    pub mod request;
    pub mod validator;
}

pub mod elevator {
    pub mod event;
    pub mod state;
    pub mod stop_signal;
    pub mod worker;
}

pub mod manager {
    pub mod dispatcher;
}

pub mod input {
    pub mod command;
}

pub mod util {
    pub mod config;
    pub mod constants;
}

pub mod error;
