use anyhow::Result;
use filecrypt::Error;
use std::io::{self, BufRead, IsTerminal};
use zeroize::Zeroizing;

/// Resolves the passphrase for an operation.
///
/// Order: `--password` / `FILECRYPT_PASSWORD` (already parsed by clap), then a
/// line from stdin when it is piped, then an interactive prompt. New
/// passphrases for encryption are prompted twice on a TTY.
pub fn read_password(from_args: Option<String>, confirm: bool) -> Result<Zeroizing<String>> {
    if let Some(pw) = from_args.map(Zeroizing::new) {
        return non_empty(pw);
    }

    //  echo "supersecret" | filecrypt decrypt notes.txt.enc
    if !io::stdin().is_terminal() {
        let mut buf = Zeroizing::new(String::new());
        io::stdin().lock().read_line(&mut buf)?;
        trim_newline(&mut buf);
        return non_empty(buf);
    }

    let pw = Zeroizing::new(rpassword::prompt_password("Password: ")?);
    if confirm {
        let again = Zeroizing::new(rpassword::prompt_password("Confirm password: ")?);
        if pw != again {
            return Err(Error::Usage("passwords do not match".into()).into());
        }
    }
    non_empty(pw)
}

fn non_empty(pw: Zeroizing<String>) -> Result<Zeroizing<String>> {
    if pw.is_empty() {
        return Err(Error::Usage("password is required".into()).into());
    }
    Ok(pw)
}

fn trim_newline(s: &mut String) {
    while s.ends_with('\n') || s.ends_with('\r') {
        s.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trim_newline_strips_crlf_only() {
        let mut s = String::from(" pass word \r\n");
        trim_newline(&mut s);
        assert_eq!(s, " pass word ");
    }

    #[test]
    fn explicit_password_wins() {
        let pw = read_password(Some("pw".into()), true).unwrap();
        assert_eq!(pw.as_str(), "pw");
    }

    #[test]
    fn empty_explicit_password_is_rejected() {
        let err = read_password(Some(String::new()), false).unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::Usage(_))));
    }
}
