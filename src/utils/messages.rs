/// Localized speech strings (dispatch-agnostic)
///
/// A static table per supported locale; lookup falls back to English. The
/// `{name}` placeholder receives ", Jose" or the empty string, so templates
/// read naturally whether or not the given name is known.

/// The full set of speech strings for one locale
pub struct Messages {
    pub welcome: &'static str,
    pub register: &'static str,
    pub days_left: &'static str,
    pub will_turn: &'static str,
    pub greet: &'static str,
    pub now_turn: &'static str,
    pub also_today: &'static str,
    pub conjunction: &'static str,
    pub overwrite: &'static str,
    pub missing: &'static str,
    pub help: &'static str,
    pub help_long: &'static str,
    pub goodbye: &'static str,
    pub fallback: &'static str,
    pub reflector: &'static str,
    pub error: &'static str,
    pub no_timezone: &'static str,
    pub cancel: &'static str,
    pub reminder_created: &'static str,
    pub missing_permission: &'static str,
    pub unsupported_device: &'static str,
    pub reminder_error: &'static str,
    pub api_error: &'static str,
    pub celebrity_birthdays: &'static str,
}

const EN_US: Messages = Messages {
    welcome: "Hello{name}, welcome to Happy Birthday. I can remember your birthday and count the days until it. When were you born? ",
    register: "Thanks{name}, I will remember that you were born on {month} {day}, {year}. ",
    days_left: "There are {count} days left until your birthday{name}. ",
    will_turn: "You will turn {count} years old. ",
    greet: "Happy birthday{name}! ",
    now_turn: "You are now {count} years old. ",
    also_today: "Also born today: ",
    conjunction: " and ",
    overwrite: "If you want to change the date, just tell me a new one. ",
    missing: "I don't seem to know your birthday yet. When were you born? ",
    help: "You can tell me your date of birth, ask me how many days are left, or set a birthday reminder. ",
    help_long: "I can remember your birthday. Tell me your date of birth by saying, I was born on, followed by the date. You can also ask me how many days are left until your birthday, or ask me to remind you of it. How can I help? ",
    goodbye: "Goodbye{name}, see you soon! ",
    fallback: "Sorry, I don't know about that. Please try again. ",
    reflector: "You just triggered {intent}. ",
    error: "Sorry, something went wrong. Please try again. ",
    no_timezone: "I couldn't determine your timezone. Please check your device settings and try again. ",
    cancel: "Okay, I won't create the reminder. ",
    reminder_created: "Your birthday reminder has been created. ",
    missing_permission: "I need permission to create reminders. I've sent a card to your companion app so you can enable it. ",
    unsupported_device: "Sorry, reminders are not supported on this device. ",
    reminder_error: "Sorry, I couldn't create the reminder. Please try again later. ",
    api_error: "Sorry, I couldn't reach the birthdays dataset right now. ",
    celebrity_birthdays: "On this day were born: ",
};

const ES_ES: Messages = Messages {
    welcome: "Hola{name}, bienvenido a Feliz Cumpleaños. Puedo recordar tu cumpleaños y contar los días que faltan. ¿Cuándo naciste? ",
    register: "Gracias{name}, recordaré que naciste el {day} de {month} de {year}. ",
    days_left: "Quedan {count} días para tu cumpleaños{name}. ",
    will_turn: "Cumplirás {count} años. ",
    greet: "¡Feliz cumpleaños{name}! ",
    now_turn: "Ahora tienes {count} años. ",
    also_today: "Hoy también nacieron: ",
    conjunction: " y ",
    overwrite: "Si quieres cambiar la fecha, solo dime una nueva. ",
    missing: "Parece que aún no sé tu cumpleaños. ¿Cuándo naciste? ",
    help: "Puedes decirme tu fecha de nacimiento, preguntarme cuántos días faltan, o pedirme que te lo recuerde. ",
    help_long: "Puedo recordar tu cumpleaños. Dime tu fecha de nacimiento diciendo, nací el, seguido de la fecha. También puedes preguntarme cuántos días faltan para tu cumpleaños, o pedirme que te lo recuerde. ¿Cómo te puedo ayudar? ",
    goodbye: "Hasta luego{name}, ¡que tengas un buen día! ",
    fallback: "Lo siento, no sé nada sobre eso. Por favor inténtalo otra vez. ",
    reflector: "Acabas de activar {intent}. ",
    error: "Lo siento, ha habido un problema. Por favor inténtalo otra vez. ",
    no_timezone: "No he podido determinar tu zona horaria. Revisa la configuración de tu dispositivo e inténtalo otra vez. ",
    cancel: "Vale, no crearé el recordatorio. ",
    reminder_created: "Tu recordatorio de cumpleaños ha sido creado. ",
    missing_permission: "Necesito permiso para crear recordatorios. Te he enviado una tarjeta a tu aplicación para que lo actives. ",
    unsupported_device: "Lo siento, este dispositivo no soporta recordatorios. ",
    reminder_error: "Lo siento, no he podido crear el recordatorio. Inténtalo más tarde. ",
    api_error: "Lo siento, ahora mismo no puedo consultar la base de datos de cumpleaños. ",
    celebrity_birthdays: "En este día nacieron: ",
};

/// Look up the message table for a locale tag, falling back to English
pub fn for_locale(locale: &str) -> &'static Messages {
    match locale.split('-').next().unwrap_or_default() {
        "es" => &ES_ES,
        _ => &EN_US,
    }
}

/// Substitute `{key}` placeholders in a template
pub fn render(template: &str, args: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (key, value) in args {
        out = out.replace(&format!("{{{}}}", key), value);
    }
    out
}

/// Join person names the way the skill speaks them: periods between entries,
/// a spoken conjunction before the last one
pub fn join_names(names: &[String], conjunction: &str) -> String {
    let mut out = String::new();
    for (index, name) in names.iter().enumerate() {
        if names.len() > 1 && index == names.len() - 2 {
            out.push_str(name);
            out.push_str(conjunction);
        } else {
            out.push_str(name);
            out.push_str(". ");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_locale_falls_back_to_english() {
        assert!(for_locale("en-US").welcome.contains("Happy Birthday"));
        assert!(for_locale("es-ES").welcome.contains("Feliz"));
        assert!(for_locale("es-MX").welcome.contains("Feliz"));
        assert!(for_locale("fr-FR").welcome.contains("Happy Birthday"));
        assert!(for_locale("").welcome.contains("Happy Birthday"));
    }

    #[test]
    fn test_render_substitutes_placeholders() {
        let speech = render("There are {count} days left{name}. ", &[
            ("name", ", Jose"),
            ("count", "14"),
        ]);
        assert_eq!(speech, "There are 14 days left, Jose. ");
    }

    #[test]
    fn test_render_with_absent_name_reads_naturally() {
        let speech = render(EN_US.days_left, &[("name", ""), ("count", "3")]);
        assert_eq!(speech, "There are 3 days left until your birthday. ");
    }

    #[test]
    fn test_join_names() {
        let names = vec![
            "Ada Lovelace".to_string(),
            "Grace Hopper".to_string(),
            "Alan Turing".to_string(),
        ];
        assert_eq!(
            join_names(&names, " and "),
            "Ada Lovelace. Grace Hopper and Alan Turing. "
        );

        let one = vec!["Ada Lovelace".to_string()];
        assert_eq!(join_names(&one, " and "), "Ada Lovelace. ");
        assert_eq!(join_names(&[], " and "), "");
    }
}
